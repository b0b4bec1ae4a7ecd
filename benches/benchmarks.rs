use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::PathBuf;

use scaffolder::catalog::load_catalog;
use scaffolder::params::ParameterSet;
use scaffolder::plan::plan_entries;
use scaffolder::render::{render_content, Template};
use scaffolder::resolve_parameters;

fn catalog_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("catalogs")
        .join(name)
}

fn sample_parameters() -> ParameterSet {
    ParameterSet::from_pairs([
        ("package", "com.selfie"),
        ("version", "0.1.0"),
        ("root", "bench-project"),
    ])
    .unwrap()
}

fn bench_catalog_loading(c: &mut Criterion) {
    let path = catalog_path("rust-services.toml");

    c.bench_function("load_catalog", |b| {
        b.iter(|| {
            let catalog = load_catalog(black_box(&path)).unwrap();
            black_box(catalog)
        });
    });
}

fn bench_template_parsing(c: &mut Criterion) {
    let source = "package {{package}}.{{ feature }}\n\nobject Module {\n    const val NAME = \"{{root}}\"\n}\n"
        .repeat(20);

    c.bench_function("parse_template", |b| {
        b.iter(|| {
            let template = Template::parse(black_box(&source)).unwrap();
            black_box(template)
        });
    });
}

fn bench_content_rendering(c: &mut Criterion) {
    let source = "name: {{{{ .Release.Name }}}}\nimage: {{root}}:{{version}}\n".repeat(20);
    let params = sample_parameters();

    c.bench_function("render_content", |b| {
        b.iter(|| {
            let rendered = render_content(black_box(&source), &params, "bench").unwrap();
            black_box(rendered)
        });
    });
}

fn bench_plan_entries(c: &mut Criterion) {
    let catalog = load_catalog(&catalog_path("kmp-monorepo.toml")).unwrap();
    let params = resolve_parameters(
        &catalog,
        None,
        &ParameterSet::new(),
        &sample_parameters(),
        &PathBuf::from("bench-project"),
    );

    c.bench_function("plan_entries", |b| {
        b.iter(|| {
            let planned = plan_entries(black_box(&catalog), &params);
            black_box(planned)
        });
    });
}

criterion_group!(
    benches,
    bench_catalog_loading,
    bench_template_parsing,
    bench_content_rendering,
    bench_plan_entries,
);
criterion_main!(benches);
