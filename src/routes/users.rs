use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::query::filters::UserFilter;
use crate::repository::DieselRepository;
use crate::routes::{error_response, parse_descriptor};
use crate::services::users as users_service;

#[get("/admin/users")]
pub async fn list_users(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let descriptor = match parse_descriptor::<UserFilter>(&req, &server_config) {
        Ok(descriptor) => descriptor,
        Err(response) => return response,
    };

    match users_service::list_users(repo.get_ref(), &user, &descriptor) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list users"),
    }
}

#[post("/admin/users/{user_id}/toggle")]
pub async fn toggle_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match users_service::toggle_user(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(account) => HttpResponse::Ok().json(account),
        Err(err) => error_response(err, "toggle user"),
    }
}
