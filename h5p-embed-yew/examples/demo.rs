use h5p_embed_yew::App;

fn main() {
    // Initialize tracing for WASM
    tracing_wasm::set_as_global_default();

    tracing::info!("Starting H5P embed demo");

    yew::Renderer::<App>::new().render();
}
