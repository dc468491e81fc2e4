//! Posta Vermaas backend - binary entry point.
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    postavermaas_backend::run().await;
}
