//! `cargo run --example extract_links`
extern crate env_logger;
extern crate linkextract;

use env_logger::Env;
use linkextract::{ExtractorConfigBuilder, LinkExtractor, Response};

fn main() {
    let env = Env::default()
        .filter_or("RUST_LOG", "info")
        .write_style_or("RUST_LOG_STYLE", "always");
    env_logger::init_from_env(env);

    let config = ExtractorConfigBuilder::new()
        .with_allow_domains("rsseau.fr")
        .with_deny(r"/tag/")
        .build()
        .expect("valid configuration");
    let extractor = LinkExtractor::new(config);

    let response = Response::new(
        "https://rsseau.fr/",
        r#"<html><body>
            <a href="/about">About</a>
            <a href="/tag/rust">Rust posts</a>
            <a href="https://external.example/">External</a>
        </body></html>"#,
    );

    for link in extractor.extract_links(&response) {
        println!("{} -- {}", link.url, link.text);
    }
}
