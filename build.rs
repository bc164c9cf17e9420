// Stamps the binary with its build date for `--version`.
fn main() {
    let date = chrono::Utc::now().format("%Y-%m-%d");
    println!("cargo:rustc-env=KICADCUT_BUILD_DATE={}", date);
}
