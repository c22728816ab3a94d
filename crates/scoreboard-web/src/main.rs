mod app;
mod components;
mod platform;

fn main() {
    dioxus::launch(app::App);
}
