use actix_web::{HttpRequest, HttpResponse, Responder, get, post, put, web};

use crate::forms::applications::{ApplicationStatusForm, ApplyForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::query::filters::ApplicationFilter;
use crate::repository::DieselRepository;
use crate::routes::{error_response, parse_descriptor};
use crate::services::applications as applications_service;

#[post("/jobs/{job_id}/applications")]
pub async fn apply_to_job(
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ApplyForm>,
) -> impl Responder {
    match applications_service::apply_to_job(repo.get_ref(), &user, job_id.into_inner(), form) {
        Ok(application) => HttpResponse::Created().json(application),
        Err(err) => error_response(err, "apply to job"),
    }
}

#[get("/employer/jobs/{job_id}/applications")]
pub async fn job_applications(
    req: HttpRequest,
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let descriptor = match parse_descriptor::<ApplicationFilter>(&req, &server_config) {
        Ok(descriptor) => descriptor,
        Err(response) => return response,
    };

    match applications_service::list_job_applications(
        repo.get_ref(),
        &user,
        job_id.into_inner(),
        &descriptor,
    ) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list applications"),
    }
}

#[put("/applications/{application_id}/status")]
pub async fn update_application_status(
    application_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ApplicationStatusForm>,
) -> impl Responder {
    match applications_service::update_application_status(
        repo.get_ref(),
        &user,
        application_id.into_inner(),
        form,
    ) {
        Ok(application) => HttpResponse::Ok().json(application),
        Err(err) => error_response(err, "update application status"),
    }
}
