use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};

use crate::forms::jobs::CreateJobForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::query::filters::JobFilter;
use crate::repository::DieselRepository;
use crate::routes::{error_response, parse_descriptor};
use crate::services::jobs as jobs_service;

#[get("/jobs")]
pub async fn list_jobs(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let descriptor = match parse_descriptor::<JobFilter>(&req, &server_config) {
        Ok(descriptor) => descriptor,
        Err(response) => return response,
    };

    match jobs_service::list_open_jobs(repo.get_ref(), &descriptor) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list jobs"),
    }
}

#[get("/jobs/{job_id}")]
pub async fn show_job(job_id: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    match jobs_service::get_job(repo.get_ref(), job_id.into_inner()) {
        Ok(job) => HttpResponse::Ok().json(job),
        Err(err) => error_response(err, "load job"),
    }
}

#[post("/jobs")]
pub async fn create_job(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateJobForm>,
) -> impl Responder {
    match jobs_service::create_job(repo.get_ref(), &user, form) {
        Ok(job) => HttpResponse::Created().json(job),
        Err(err) => error_response(err, "create job"),
    }
}

#[delete("/jobs/{job_id}")]
pub async fn delete_job(
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match jobs_service::delete_job(repo.get_ref(), &user, job_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "delete job"),
    }
}

#[get("/employer/jobs")]
pub async fn employer_jobs(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let descriptor = match parse_descriptor::<JobFilter>(&req, &server_config) {
        Ok(descriptor) => descriptor,
        Err(response) => return response,
    };

    match jobs_service::list_employer_jobs(repo.get_ref(), &user, &descriptor) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list employer jobs"),
    }
}
