use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::time::Duration;
use registry_gate::gate::RateGate;
use registry_gate::registry::{Description, Document, Product};
use chrono::NaiveDate;

fn bench_gate_fast_path(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    // Short window so the history never saturates during the run
    let gate = RateGate::new(1_000_000, Duration::from_millis(10)).unwrap();

    c.bench_function("gate_acquire_fast_path", |b| b.iter(|| {
        runtime.block_on(gate.acquire()).unwrap()
    }));

    c.bench_function("gate_try_acquire", |b| b.iter(|| {
        black_box(gate.try_acquire())
    }));
}

fn bench_document_payload(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let product = Product {
        certificate_document: Some("CONFORMITY_CERTIFICATE".into()),
        certificate_document_date: Some(date),
        certificate_document_number: Some("C-1".into()),
        owner_inn: "7700000001".into(),
        producer_inn: "7700000002".into(),
        production_date: date,
        tnved_code: "6401100000".into(),
        uit_code: Some("010460406000600021N4N57RSCBUZTQ".into()),
        uitu_code: None,
    };
    let document = Document {
        description: Some(Description { participant_inn: "7700000000".into() }),
        doc_id: "doc-1".into(),
        doc_status: "NEW".into(),
        doc_type: "LP_INTRODUCE_GOODS".into(),
        import_request: false,
        owner_inn: "7700000001".into(),
        participant_inn: "7700000000".into(),
        producer_inn: "7700000002".into(),
        production_date: date,
        production_type: "OWN_PRODUCTION".into(),
        products: vec![product; 50],
        reg_date: date,
        reg_number: "REG-1".into(),
    };

    c.bench_function("document_to_payload", |b| b.iter(|| {
        black_box(&document).to_payload()
    }));
}

criterion_group!(benches, bench_gate_fast_path, bench_document_payload);
criterion_main!(benches);
