#[actix_web::main]
async fn main() -> std::io::Result<()> {
    survey_intake_lib::run().await
}
