fn main() {
    for var in [
        "H5P_PLAYER_BASE",
        "H5P_CONTENT_BASE",
        "H5P_ASSET_VERSION",
        "H5P_COLLECTOR_URL",
    ] {
        println!("cargo:rerun-if-env-changed={}", var);
    }
}
