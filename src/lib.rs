pub mod pagination;
pub mod query;

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EMPLOYER: &str = "employer";
pub const ROLE_CANDIDATE: &str = "candidate";

#[cfg(feature = "server")]
pub use server::{configure_api, run};

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::db::establish_connection_pool;
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::applications::{apply_to_job, job_applications, update_application_status};
    use crate::routes::catalog::{
        admin_categories, admin_skills, create_category, create_skill, delete_category,
        delete_skill, list_categories, list_skills, toggle_category, toggle_skill,
    };
    use crate::routes::jobs::{create_job, delete_job, employer_jobs, list_jobs, show_job};
    use crate::routes::users::{list_users, toggle_user};

    /// Registers every `/api/v1` endpoint.
    ///
    /// Handlers expect `web::Data<DieselRepository>` and `web::Data<ServerConfig>`
    /// to be registered on the app.
    pub fn configure_api(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/api/v1")
                .service(list_jobs)
                .service(create_job)
                .service(show_job)
                .service(delete_job)
                .service(apply_to_job)
                .service(employer_jobs)
                .service(job_applications)
                .service(update_application_status)
                .service(list_categories)
                .service(list_skills)
                .service(admin_categories)
                .service(create_category)
                .service(toggle_category)
                .service(delete_category)
                .service(admin_skills)
                .service(create_skill)
                .service(toggle_skill)
                .service(delete_skill)
                .service(list_users)
                .service(toggle_user),
        );
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = DieselRepository::new(pool);

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .configure(configure_api)
                .service(Files::new("/assets", &server_config.assets_dir))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
