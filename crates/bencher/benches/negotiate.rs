use std::hint::black_box;

use bencher::TestCase;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use http::Request;
use language_header::cache::PageCacheKillSwitch;
use language_header::RequestContext;

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::small("single_entry_hit", true),
        TestCase::normal("normal_table_hit", true),
        TestCase::normal("normal_table_miss", false),
        TestCase::large("large_table_hit", true),
        TestCase::large("large_table_miss", false),
    ]
}

fn benchmark_header_negotiation(criterion: &mut Criterion) {
    let test_cases = create_test_cases();
    let mut group = criterion.benchmark_group("header_negotiation");

    for case in test_cases {
        let negotiation = case.negotiation();
        let (name, value) = case.header();
        let request = Request::builder().uri("/node/1").header(name, value).body(()).expect("bench request should be valid");

        group.throughput(Throughput::Elements(case.entries() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &request, |b, request| {
            b.iter(|| {
                let kill_switch = PageCacheKillSwitch::new();
                let langcode = negotiation.decide(Some(&RequestContext::from_request(request)), &kill_switch);
                black_box(langcode);
            });
        });
    }

    group.finish();
}

criterion_group!(negotiate, benchmark_header_negotiation);
criterion_main!(negotiate);
