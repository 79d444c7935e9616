use htmlmin_core::{get_preset, minify, Options};

fn main() {
    divan::main();
}

const SMALL_FRAGMENT: &str = r#"<div   class="a   b" >
    <p>Hello <b>world</b>  </p>
    <img src="x.png"/>
</div>"#;

const SVG_FRAGMENT: &str = r#"<svg viewBox="0.000 0.000 100.000 100.000">
  <path d="M 0.000 0.000 L 10.000 10.000 Z"/>
  <circle cx="5.000" cy="5.000" r="2.000"></circle>
</svg>"#;

fn repeated_page(reps: usize) -> String {
    let mut page = String::from("<!doctype html><html><head><title>Bench</title></head><body>");
    for _ in 0..reps {
        page.push_str(SMALL_FRAGMENT);
        page.push_str(SVG_FRAGMENT);
    }
    page.push_str("</body></html>");
    page
}

#[divan::bench]
fn bench_default_options_small_fragment(bencher: divan::Bencher) {
    let options = Options::default();
    bencher.bench(|| minify(SMALL_FRAGMENT, &options).expect("minify must succeed"));
}

#[divan::bench]
fn bench_comprehensive_preset_small_fragment(bencher: divan::Bencher) {
    let options = get_preset("comprehensive").expect("preset must exist");
    bencher.bench(|| minify(SMALL_FRAGMENT, &options).expect("minify must succeed"));
}

#[divan::bench]
fn bench_svg_geometry_trimming(bencher: divan::Bencher) {
    let options = Options {
        collapse_whitespace: true,
        ..Options::default()
    };
    bencher.bench(|| minify(SVG_FRAGMENT, &options).expect("minify must succeed"));
}

#[divan::bench(args = [10, 100])]
fn bench_page_scaling(bencher: divan::Bencher, reps: usize) {
    let page = repeated_page(reps);
    let options = get_preset("comprehensive").expect("preset must exist");
    bencher.bench(|| minify(&page, &options).expect("minify must succeed"));
}
