//! Benchmark for the dictation text pipeline.
//!
//! Interim recognition results can arrive many times per second and each
//! one runs translate + combine before the debounced write. The full
//! pipeline cost must stay far below the debounce interval (~100ms) so the
//! coalesced write never lags behind speech.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use dicta_text::{combine, translate};

/// Generate a realistic dictated sentence containing spoken commands.
///
/// The command mix varies by index to exercise different table entries.
fn generate_fragment(index: usize) -> String {
    let tail = match index % 4 {
        0 => "period",
        1 => "comma and then some more words",
        2 => "question mark new line",
        _ => "exclamation mark",
    };

    format!(
        "this is a dictated sentence about the quarterly planning meeting \
         where we discussed the roadmap the hiring plan and the release \
         schedule for the next two quarters {} fragment number {}",
        tail, index
    )
}

fn bench_translate(c: &mut Criterion) {
    let fragments: Vec<String> = (0..32).map(generate_fragment).collect();

    let mut group = c.benchmark_group("translate");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("english_fragment", |b| {
        let mut i = 0;
        b.iter(|| {
            let out = translate(&fragments[i % fragments.len()], "en-US");
            i += 1;
            out
        });
    });

    group.bench_function("persian_fragment", |b| {
        b.iter(|| translate("سلام دنیا نقطه خط جدید ادامه متن ویرگول", "fa-IR"));
    });

    group.finish();
}

fn bench_interim_update_cycle(c: &mut Criterion) {
    // One simulated recognition event: translate the interim fragment, then
    // merge it onto an already sizeable accumulated buffer.
    let base = generate_fragment(0).repeat(8);

    c.bench_function("interim_update_cycle", |b| {
        b.iter(|| {
            let interim = translate("and one more clause comma still speaking", "en-US");
            combine(&base, "", &interim)
        });
    });
}

criterion_group!(benches, bench_translate, bench_interim_update_cycle);
criterion_main!(benches);
