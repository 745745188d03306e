//! Integration tests for the arrange-and-store pipeline.

use codeprint::align::Termination;
use codeprint::arrange::arrange_documents;
use codeprint::config::{Acceptance, Encoding, SearchBudget};
use codeprint::io::reader::{BANNER_RULE, COMPANION_MARKER};
use codeprint::sink::Sink;
use tempfile::TempDir;

use crate::common::{fixture_path, require_fixture, test_config, write_document};

#[tokio::test]
async fn test_arrange_fixtures_and_store() {
    require_fixture("hello.c");
    require_fixture("fib.py");
    require_fixture("stack.h");

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("printfile");
    let config = test_config(
        vec![
            fixture_path("hello.c"),
            fixture_path("fib.py"),
            fixture_path("stack.h"),
        ],
        output.clone(),
    );

    let result = arrange_documents(&config).await.unwrap();
    let report = Sink::from_config(&config)
        .deliver(&result.text)
        .await
        .unwrap();

    assert_eq!(report.output, output);
    assert!(report.formatter.is_none());

    let stored = std::fs::read_to_string(&output).unwrap();
    assert_eq!(stored, result.text);
    assert_eq!(stored.lines().count(), result.statistics.output_lines);
    assert_eq!(stored.matches(BANNER_RULE).count(), 6);
    assert_eq!(stored.matches(COMPANION_MARKER).count(), 1);
    assert!(stored.contains("* FILE:  "));
    assert!(stored.contains("$ python3 fib.py 10"));

    // Three short files fit on one 73-line page with no forced padding.
    assert_eq!(result.statistics.whitespace_cost, 0);
    assert_eq!(result.statistics.page_count, 1);
    assert_eq!(result.statistics.termination, Termination::EarlyAccepted);
}

#[tokio::test]
async fn test_three_documents_exact_output() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = vec![
        write_document(temp_dir.path(), "a.c", 12),
        write_document(temp_dir.path(), "b.c", 3),
        write_document(temp_dir.path(), "c.c", 25),
    ];
    let mut config = test_config(inputs, temp_dir.path().join("printfile"));
    config.page_capacity = 10;

    let result = arrange_documents(&config).await.unwrap();
    let lines: Vec<&str> = result.text.lines().collect();

    assert_eq!(lines.len(), 46);
    assert_eq!(lines[0], BANNER_RULE);
    assert_eq!(lines[11], "a.c:9");
    assert_eq!((lines[12], lines[13]), ("", ""));
    assert_eq!(lines[14], BANNER_RULE);
    assert_eq!((lines[17], lines[18]), ("", ""));
    assert_eq!(lines[19], BANNER_RULE);
    assert_eq!(lines[43], "c.c:22");
    assert_eq!((lines[44], lines[45]), ("", ""));
    assert_eq!(result.statistics.permutations_examined, 1);
}

#[tokio::test]
async fn test_reordering_saves_paper() {
    let temp_dir = TempDir::new().unwrap();
    // At 10 lines per page the 17-line file leaves 1 line after its
    // separator, so in input order the 9-line file needs a 1-line pad.
    let inputs = vec![
        write_document(temp_dir.path(), "seventeen.c", 17),
        write_document(temp_dir.path(), "nine.c", 9),
        write_document(temp_dir.path(), "eleven.c", 11),
    ];
    let mut config = test_config(inputs.clone(), temp_dir.path().join("printfile"));
    config.page_capacity = 10;
    config.acceptance = Acceptance::Never;

    let result = arrange_documents(&config).await.unwrap();

    assert_eq!(result.statistics.whitespace_cost, 0);
    assert_eq!(result.statistics.termination, Termination::Exhausted);
    assert_eq!(result.statistics.permutations_examined, 6);
    assert_eq!(
        result.arranged_files(),
        vec![inputs[1].clone(), inputs[0].clone(), inputs[2].clone()]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_output_matches_sequential() {
    let temp_dir = TempDir::new().unwrap();
    let inputs: Vec<_> = [41, 77, 12, 95, 60, 33, 18]
        .iter()
        .enumerate()
        .map(|(i, n)| write_document(temp_dir.path(), &format!("part{i}.rs"), *n))
        .collect();

    let mut config = test_config(inputs, temp_dir.path().join("printfile"));
    let sequential = arrange_documents(&config).await.unwrap();

    config.jobs = Some(4);
    let parallel = arrange_documents(&config).await.unwrap();

    assert_eq!(parallel.text, sequential.text);
    assert_eq!(parallel.plan, sequential.plan);
    assert_eq!(
        parallel.statistics.termination,
        sequential.statistics.termination
    );
}

#[tokio::test]
async fn test_budget_limits_search() {
    let temp_dir = TempDir::new().unwrap();
    let inputs: Vec<_> = (0..9)
        .map(|i| write_document(temp_dir.path(), &format!("f{i}.c"), 60 + i))
        .collect();

    let mut config = test_config(inputs, temp_dir.path().join("printfile"));
    config.acceptance = Acceptance::Never;
    config.budget = SearchBudget {
        max_permutations: Some(1_000),
        time_limit: None,
    };

    let result = arrange_documents(&config).await.unwrap();

    assert_eq!(result.statistics.termination, Termination::BudgetExhausted);
    assert_eq!(result.statistics.permutations_examined, 1_000);
    assert_eq!(result.documents.len(), 9);
}

#[tokio::test]
async fn test_latin1_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("greeting.txt");
    std::fs::write(&input, "gr\u{fc}\u{df} dich\n").unwrap();

    let mut config = test_config(vec![input], temp_dir.path().join("printfile"));
    config.encoding = Encoding::Latin1;

    let result = arrange_documents(&config).await.unwrap();
    Sink::from_config(&config)
        .deliver(&result.text)
        .await
        .unwrap();

    let bytes = std::fs::read(&config.output).unwrap();
    assert!(bytes.windows(4).any(|w| w == b"gr\xfc\xdf"));
    assert_eq!(bytes.len(), result.text.chars().count());
}

#[tokio::test]
async fn test_companions_can_be_disabled() {
    require_fixture("fib.py");

    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(
        vec![fixture_path("fib.py")],
        temp_dir.path().join("printfile"),
    );
    config.companions = false;

    let result = arrange_documents(&config).await.unwrap();
    assert!(!result.text.contains(COMPANION_MARKER));
    assert_eq!(result.statistics.document_lines, 3 + 12);
}
