use nutrient_mix::app;

fn main() {
    app::run();
}
