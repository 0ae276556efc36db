use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};

use crate::forms::catalog::CatalogForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::query::filters::CatalogFilter;
use crate::repository::DieselRepository;
use crate::routes::{error_response, parse_descriptor};
use crate::services::catalog as catalog_service;

#[get("/categories")]
pub async fn list_categories(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let descriptor = match parse_descriptor::<CatalogFilter>(&req, &server_config) {
        Ok(descriptor) => descriptor,
        Err(response) => return response,
    };

    match catalog_service::list_categories(repo.get_ref(), &descriptor) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list categories"),
    }
}

#[get("/skills")]
pub async fn list_skills(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let descriptor = match parse_descriptor::<CatalogFilter>(&req, &server_config) {
        Ok(descriptor) => descriptor,
        Err(response) => return response,
    };

    match catalog_service::list_skills(repo.get_ref(), &descriptor) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list skills"),
    }
}

#[get("/admin/categories")]
pub async fn admin_categories(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let descriptor = match parse_descriptor::<CatalogFilter>(&req, &server_config) {
        Ok(descriptor) => descriptor,
        Err(response) => return response,
    };

    match catalog_service::admin_list_categories(repo.get_ref(), &user, &descriptor) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list categories"),
    }
}

#[post("/admin/categories")]
pub async fn create_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CatalogForm>,
) -> impl Responder {
    match catalog_service::create_category(repo.get_ref(), &user, form) {
        Ok(category) => HttpResponse::Created().json(category),
        Err(err) => error_response(err, "create category"),
    }
}

#[post("/admin/categories/{category_id}/toggle")]
pub async fn toggle_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match catalog_service::toggle_category(repo.get_ref(), &user, category_id.into_inner()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(err, "toggle category"),
    }
}

#[delete("/admin/categories/{category_id}")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match catalog_service::delete_category(repo.get_ref(), &user, category_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "delete category"),
    }
}

#[get("/admin/skills")]
pub async fn admin_skills(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let descriptor = match parse_descriptor::<CatalogFilter>(&req, &server_config) {
        Ok(descriptor) => descriptor,
        Err(response) => return response,
    };

    match catalog_service::admin_list_skills(repo.get_ref(), &user, &descriptor) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list skills"),
    }
}

#[post("/admin/skills")]
pub async fn create_skill(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CatalogForm>,
) -> impl Responder {
    match catalog_service::create_skill(repo.get_ref(), &user, form) {
        Ok(skill) => HttpResponse::Created().json(skill),
        Err(err) => error_response(err, "create skill"),
    }
}

#[post("/admin/skills/{skill_id}/toggle")]
pub async fn toggle_skill(
    skill_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match catalog_service::toggle_skill(repo.get_ref(), &user, skill_id.into_inner()) {
        Ok(skill) => HttpResponse::Ok().json(skill),
        Err(err) => error_response(err, "toggle skill"),
    }
}

#[delete("/admin/skills/{skill_id}")]
pub async fn delete_skill(
    skill_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match catalog_service::delete_skill(repo.get_ref(), &user, skill_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "delete skill"),
    }
}
