// Linear memory is owned by the host and imported as `js.shared_mem`.
// The shadow stack is kept below the first 64KiB page so the host can place
// its vector zones from there on.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    if std::env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("wasm32") {
        println!("cargo:rustc-cdylib-link-arg=--import-memory=js,shared_mem");
        println!("cargo:rustc-cdylib-link-arg=-zstack-size=32768");
        println!("cargo:rustc-cdylib-link-arg=--export=__heap_base");
    }
}
