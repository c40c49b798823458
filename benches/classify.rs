use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};

use viranvio::classify::{FilterOptions, classify, passes_filters};
use viranvio::global_signal::{Fragment, Prediction};
use viranvio::splits::SplitRecord;

fn synthetic_inputs(
    num_contigs: usize,
    splits_per_contig: usize,
) -> (
    Vec<SplitRecord>,
    HashMap<String, Prediction>,
    HashMap<String, i64>,
) {
    let mut splits = Vec::new();
    let mut predictions = HashMap::new();
    let mut lengths = HashMap::new();

    for c in 0..num_contigs {
        let contig = format!("ctg{c}");
        let fragment = if c % 2 == 0 {
            Fragment::WholeContig
        } else {
            Fragment::Prophage {
                start_gene: "gene_3".to_string(),
                stop_gene: "gene_7".to_string(),
                start_bp: 5000,
                stop_bp: 45000,
            }
        };
        predictions.insert(
            contig.clone(),
            Prediction {
                contig: contig.clone(),
                num_genes_in_contig: 60,
                fragment_id: contig.clone(),
                num_fragment_genes: 40,
                num_hallmark_genes: 5,
                is_circular: false,
                category: (c % 3 + 1) as u8,
                label: format!("phage_{c}"),
                fragment,
            },
        );
        lengths.insert(contig.clone(), (splits_per_contig * 20000) as i64);

        for s in 0..splits_per_contig {
            let start = (s * 20000) as i64;
            splits.push(SplitRecord {
                name: format!("{contig}_split_{s:05}"),
                start,
                stop: start + 20000,
                length: 20000,
                parent: contig.clone(),
            });
        }
    }

    (splits, predictions, lengths)
}

fn bench_classification_pass(c: &mut Criterion) {
    let (splits, predictions, lengths) = synthetic_inputs(1000, 50);
    let opts = FilterOptions::default();

    c.bench_function("classify 50k splits", |b| {
        b.iter(|| {
            let mut emitted = 0usize;
            for split in &splits {
                let call = classify(split, &predictions, &lengths);
                if passes_filters(&call, &opts) {
                    emitted += 1;
                }
            }
            assert!(emitted > 0);
        });
    });
}

criterion_group!(benches, bench_classification_pass);
criterion_main!(benches);
