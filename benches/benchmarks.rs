use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fxcalc::calculator::Calculator;
use fxcalc::eval::{evaluate, sanitize};
use fxcalc::format::format_number;
use fxcalc::rates::RateTable;

fn benchmark_evaluate(c: &mut Criterion) {
    c.bench_function("evaluate_nested_expression", |b| {
        b.iter(|| evaluate(black_box("((12.5+7)*3-4/2)/(1+0.25)+100*2.5")));
    });

    c.bench_function("evaluate_long_sum", |b| {
        let expr = (1..200).map(|n| n.to_string()).collect::<Vec<_>>().join("+");
        b.iter(|| evaluate(black_box(&expr)));
    });
}

fn benchmark_sanitize(c: &mut Criterion) {
    c.bench_function("sanitize_noisy_buffer", |b| {
        b.iter(|| sanitize(black_box("🇺🇸 USD 1,234.5 * 2 + 🇯🇵 JPY 6")));
    });
}

fn benchmark_convert(c: &mut Criterion) {
    let table = RateTable::from_entries(vec![
        ("USD".to_string(), 31.2),
        ("JPY".to_string(), 0.22),
        ("EUR".to_string(), 33.5),
    ])
    .unwrap();

    c.bench_function("convert_cross_currency_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                let _ = table.convert(black_box(1234.56), "USD", "JPY");
            }
        });
    });
}

fn benchmark_format(c: &mut Criterion) {
    c.bench_function("format_number", |b| {
        b.iter(|| format_number(black_box(1_234_567.890000001)));
    });
}

fn benchmark_keystroke_session(c: &mut Criterion) {
    let table = RateTable::from_entries(vec![("USD".to_string(), 31.2)]).unwrap();

    c.bench_function("calculator_session", |b| {
        b.iter(|| {
            let mut calc = Calculator::new();
            for key in ["1", "2", "3", "4", "*", "2", "+", "1"] {
                calc.press(key);
            }
            let _ = calc.calculate();
            calc.switch_currency("USD", &table);
            let _ = calc.display();
        });
    });
}

criterion_group!(
    benches,
    benchmark_evaluate,
    benchmark_sanitize,
    benchmark_convert,
    benchmark_format,
    benchmark_keystroke_session
);
criterion_main!(benches);
