use std::path::Path;

fn main() {
    // Wi-Fi credentials and other secrets come from `.env`
    dotenv_build::output(dotenv_build::Config {
        filename: Path::new(".env"),
        recursive_search: true,
        fail_if_missing_dotenv: false,
    })
    .unwrap();

    let build_version = format!(
        "{}+{}",
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().format("%Y%m%d%H%M")
    );
    println!("cargo:rustc-env=BUILD_VERSION={build_version}");
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
