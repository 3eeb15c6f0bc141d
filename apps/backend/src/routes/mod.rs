use actix_web::web;

pub mod health;
pub mod todos;

/// Configure application routes for tests and non-HttpServer contexts.
///
/// In production, `main.rs` wires the todo routes behind the token and
/// scope gates. For tests we register the same paths without those wrappers
/// so that handler behavior can be exercised directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Todo mutation routes: POST/PUT/DELETE /
    todos::configure_routes(cfg);
}
