use metawalk::{GraphIndex, NoProgress, Scheme, WalkConfig, WalkError, WalkSampler};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

fn fixture(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in [
        "id_author.txt",
        "id_paper.txt",
        "id_conf.txt",
        "paper_author.txt",
        "paper_conf.txt",
    ] {
        let contents = files
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
            .unwrap_or("");
        fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}

fn generate(index: &GraphIndex, config: WalkConfig) -> String {
    let sampler = WalkSampler::new(index, config);
    let mut out = Vec::new();
    sampler.generate(&mut out, &mut NoProgress).unwrap();
    String::from_utf8(out).unwrap()
}

/// Fully connected fixture: every paper has authors and a conference, so
/// both schemes can walk indefinitely.
fn two_conf_fixture() -> TempDir {
    fixture(&[
        ("id_author.txt", "a1\tAlice\na2\tBob\n"),
        ("id_paper.txt", "p1\tP1\np2\tP2\np3\tP3\n"),
        ("id_conf.txt", "c1\tVLDB\nc2\tKDD\n"),
        ("paper_author.txt", "p1\ta1\np2\ta1\np2\ta2\np3\ta2\n"),
        ("paper_conf.txt", "p1\tc1\np2\tc1\np3\tc2\n"),
    ])
}

fn config(scheme: Scheme, numwalks: usize, walklength: usize) -> WalkConfig {
    WalkConfig {
        scheme,
        numwalks,
        walklength,
        seed: Some(42),
        parallel: false,
    }
}

#[test]
fn cac_single_hop_example() {
    let dir = fixture(&[
        ("id_author.txt", "a1\tAlice\n"),
        ("id_paper.txt", "p1\tP1\n"),
        ("id_conf.txt", "c1\tVLDB\n"),
        ("paper_author.txt", "p1\ta1\n"),
        ("paper_conf.txt", "p1\tc1\n"),
    ]);
    let index = GraphIndex::load(dir.path()).unwrap();

    let out = generate(&index, config(Scheme::Cac, 1, 1));
    assert_eq!(out, "VLDB Alice VLDB\n");
}

#[test]
fn cac_token_count_and_alternation() {
    let dir = two_conf_fixture();
    let index = GraphIndex::load(dir.path()).unwrap();
    let walklength = 10;

    let out = generate(&index, config(Scheme::Cac, 5, walklength));

    let confs: HashSet<&str> = ["VLDB", "KDD"].into();
    let authors: HashSet<&str> = ["Alice", "Bob"].into();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2 * 5);
    for line in lines {
        let tokens: Vec<&str> = line.split(' ').collect();
        assert_eq!(tokens.len(), 2 * walklength + 1);
        for (i, token) in tokens.iter().enumerate() {
            if i % 2 == 0 {
                assert!(confs.contains(token), "token {i} not a conference: {token}");
            } else {
                assert!(authors.contains(token), "token {i} not an author: {token}");
            }
        }
    }
}

#[test]
fn csasc_token_count_and_type_cycle() {
    let dir = two_conf_fixture();
    let index = GraphIndex::load(dir.path()).unwrap();
    let walklength = 10;

    let out = generate(&index, config(Scheme::Csasc, 3, walklength));

    let confs: HashSet<&str> = ["VLDB", "KDD"].into();
    let authors: HashSet<&str> = ["Alice", "Bob"].into();
    let papers: HashSet<&str> = ["P1", "P2", "P3"].into();
    for line in out.lines() {
        let tokens: Vec<&str> = line.split(' ').collect();
        assert_eq!(tokens.len(), 4 * walklength + 1);
        assert!(confs.contains(tokens[0]));
        for (i, token) in tokens[1..].iter().enumerate() {
            let expected = match i % 4 {
                0 | 2 => &papers,
                1 => &authors,
                _ => &confs,
            };
            assert!(expected.contains(token), "token {} type mismatch: {token}", i + 1);
        }
    }
}

#[test]
fn walks_per_seed_are_contiguous_and_in_seed_order() {
    // paper_conf.txt names c2 first, so its walks come first.
    let dir = fixture(&[
        ("id_author.txt", "a1\tAlice\na2\tBob\n"),
        ("id_paper.txt", "p1\tP1\np2\tP2\n"),
        ("id_conf.txt", "c1\tVLDB\nc2\tKDD\n"),
        ("paper_author.txt", "p1\ta1\np2\ta2\n"),
        ("paper_conf.txt", "p2\tc2\np1\tc1\n"),
    ]);
    let index = GraphIndex::load(dir.path()).unwrap();

    let numwalks = 3;
    let out = generate(&index, config(Scheme::Cac, numwalks, 4));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2 * numwalks);
    for line in &lines[..numwalks] {
        assert!(line.starts_with("KDD "), "expected KDD seed: {line}");
    }
    for line in &lines[numwalks..] {
        assert!(line.starts_with("VLDB "), "expected VLDB seed: {line}");
    }
}

#[test]
fn seeded_runs_reproduce() {
    let dir = two_conf_fixture();
    let index = GraphIndex::load(dir.path()).unwrap();

    let first = generate(&index, config(Scheme::Csasc, 8, 20));
    let second = generate(&index, config(Scheme::Csasc, 8, 20));
    assert_eq!(first, second);
}

#[test]
fn parallel_output_matches_sequential() {
    let dir = two_conf_fixture();
    let index = GraphIndex::load(dir.path()).unwrap();

    let sequential = generate(&index, config(Scheme::Cac, 8, 20));
    let parallel = generate(
        &index,
        WalkConfig {
            parallel: true,
            ..config(Scheme::Cac, 8, 20)
        },
    );
    assert_eq!(sequential, parallel);
}

#[test]
fn authorless_conference_is_skipped_not_crashed() {
    // c2's only paper has no author rows; the sampler must skip it as a
    // seed and still process c1.
    let dir = fixture(&[
        ("id_author.txt", "a1\tAlice\n"),
        ("id_paper.txt", "p1\tP1\np2\tP2\n"),
        ("id_conf.txt", "c1\tVLDB\nc2\tKDD\n"),
        ("paper_author.txt", "p1\ta1\n"),
        ("paper_conf.txt", "p1\tc1\np2\tc2\n"),
    ]);
    let index = GraphIndex::load(dir.path()).unwrap();

    let sampler = WalkSampler::new(&index, config(Scheme::Cac, 4, 3));
    let mut out = Vec::new();
    let report = sampler.generate(&mut out, &mut NoProgress).unwrap();

    assert_eq!(report.seeds, 1);
    assert_eq!(report.walks, 4);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().all(|l| l.starts_with("VLDB")));
}

#[test]
fn csasc_fails_fast_on_paper_without_conference() {
    // a1 also authored p2, which never appears in paper_conf.txt. A CSASC
    // hop through p2 has no closing conference.
    let dir = fixture(&[
        ("id_author.txt", "a1\tAlice\n"),
        ("id_paper.txt", "p1\tP1\np2\tP2\n"),
        ("id_conf.txt", "c1\tVLDB\n"),
        ("paper_author.txt", "p1\ta1\np2\ta1\n"),
        ("paper_conf.txt", "p1\tc1\n"),
    ]);
    let index = GraphIndex::load(dir.path()).unwrap();

    let sampler = WalkSampler::new(&index, config(Scheme::Csasc, 10, 50));
    let mut out = Vec::new();
    let err = sampler.generate(&mut out, &mut NoProgress).unwrap_err();

    match err {
        WalkError::EmptyAdjacency { id, .. } => assert_eq!(id, "p2"),
        other => panic!("expected EmptyAdjacency, got {other}"),
    }
}

#[test]
fn empty_seed_set_produces_empty_corpus() {
    let dir = fixture(&[
        ("id_conf.txt", "c1\tVLDB\n"),
        ("paper_conf.txt", "p1\tc1\n"),
    ]);
    let index = GraphIndex::load(dir.path()).unwrap();

    let sampler = WalkSampler::new(&index, config(Scheme::Cac, 5, 5));
    let mut out = Vec::new();
    let report = sampler.generate(&mut out, &mut NoProgress).unwrap();

    assert_eq!(report.seeds, 0);
    assert_eq!(report.walks, 0);
    assert!(out.is_empty());
}
