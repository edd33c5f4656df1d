use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use sieve::Validator;
use std::hint::black_box;

fn bench_form_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("form_validation");

    let valid = json!({
        "username": "yoshi",
        "age": "21",
        "role": "admin",
        "tags": ["a", "b"],
        "address": { "city": "Toad Town" }
    });

    let invalid = json!({
        "username": "y",
        "age": "old",
        "role": "root",
        "tags": "a"
    });

    for (name, input) in [("valid_form", &valid), ("invalid_form", &invalid)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut validator = Validator::new(black_box(input.clone()));
                let _ = validator.string("username", None).between(3, 16);
                validator.integer("age", None);
                let _ = validator.string("role", None).one_of(["user", "admin"]);
                let _ = validator.array("tags", None).max(5);
                validator.string("address.city", Some(""));
                validator.passes(false)
            })
        });
    }

    group.finish();
}

fn bench_message_resolution(c: &mut Criterion) {
    let mut validator = Validator::new(json!({}));
    for field in ["a", "b", "c", "d", "e"] {
        validator.string(field, None);
    }

    c.bench_function("resolve_bag_to_json", |b| {
        b.iter(|| black_box(validator.errors().to_json()))
    });
}

criterion_group!(benches, bench_form_validation, bench_message_resolution);
criterion_main!(benches);
