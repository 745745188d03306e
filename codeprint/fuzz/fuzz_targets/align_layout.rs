#![no_main]

use codeprint::align::{Layout, PageAligner};
use codeprint::config::Acceptance;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&capacity, rest)) = data.split_first() else {
        return;
    };

    let page_capacity = usize::from(capacity).max(1);
    let counts: Vec<usize> = rest.iter().take(7).map(|&b| usize::from(b)).collect();

    let aligner = PageAligner::new(page_capacity)
        .unwrap()
        .with_acceptance(Acceptance::Never);
    let outcome = aligner.search(&counts);

    let mut sorted = outcome.order.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..counts.len()).collect::<Vec<_>>());

    assert_eq!(
        outcome.whitespace_cost,
        aligner.whitespace_cost(&counts, &outcome.order)
    );

    let identity: Vec<usize> = (0..counts.len()).collect();
    assert!(outcome.whitespace_cost <= aligner.whitespace_cost(&counts, &identity));

    let alignment = aligner.align(&counts);
    let layout: &Layout<'_, usize> = &alignment.layout;
    assert_eq!(
        layout.total_lines(),
        counts.iter().sum::<usize>() + layout.whitespace_cost() + layout.separator_lines()
    );
});
