use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use archcopilot::api;
use archcopilot::app::{get_cors, get_port, get_session_middleware, App as ArchCopilotApp};

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let archcopilot = ArchCopilotApp::new();
    let port = get_port(&archcopilot);
    let app_data = web::Data::new(archcopilot.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%a %r %s %b %{Referer}i %{User-Agent}i %T"))
            .wrap(get_cors(&archcopilot))
            .wrap(get_session_middleware(&archcopilot))
            .app_data(app_data.clone())
            .configure(api::routes)
    })
    .bind(("127.0.0.1", port))
    .unwrap_or_else(|e| panic!("Could not bind to port {}.\n{}", port, e))
    .run()
    .await
    .unwrap_or_else(|e| panic!("Could not run server to port {}.\n{}", port, e));
}
