use std::fs;

use selcarve::app::carve::{self, CarveOutcome};
use selcarve::domain::model::Region;
use selcarve::infra::config::Config;
use selcarve::infra::headless::HeadlessHost;
use tempfile::tempdir;

#[test]
fn carves_selections_from_a_file_into_new_files() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("meeting notes.txt");
    fs::write(
        &source,
        "Agenda for today\nitem one\nitem two\nAction items\ncall back\n",
    )
    .unwrap();

    let out = dir.path().join("carved");
    let mut host = HeadlessHost::with_out_dir(&out);
    let doc = host.open_source(&source).unwrap();
    host.set_selections(doc, vec![Region::new(0, 16), Region::new(35, 47)]);

    let outcome = carve::run(&mut host, &Config::default()).unwrap();
    let CarveOutcome::Completed(report) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(report.created.len(), 2);

    assert_eq!(
        fs::read_to_string(out.join("meeting notes-Agenda for today.txt")).unwrap(),
        "Agenda for today"
    );
    assert_eq!(
        fs::read_to_string(out.join("meeting notes-Action items.txt")).unwrap(),
        "Action items"
    );
}

#[test]
fn direct_variant_saves_without_prompting() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("log.txt");
    fs::write(&source, "error: disk on fire\nmore context\n").unwrap();

    let out = dir.path().join("carved");
    let mut host = HeadlessHost::with_out_dir(&out);
    let doc = host.open_source(&source).unwrap();
    host.set_selections(doc, vec![Region::new(0, 19)]);

    let outcome = carve::run_direct(&mut host, &Config::default()).unwrap();
    assert!(matches!(outcome, CarveOutcome::Completed(_)));
    assert!(host.prompted_documents().is_empty());
    assert_eq!(host.saved_documents().len(), 1);
    assert_eq!(
        fs::read_to_string(out.join("log-error disk on fire.txt")).unwrap(),
        "error: disk on fire"
    );
}

#[test]
fn colliding_suggested_names_are_uniquified() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("scratch.txt");
    fs::write(&source, "same title\nxxx\nsame title\nyyy\n").unwrap();

    let out = dir.path().join("carved");
    let mut host = HeadlessHost::with_out_dir(&out);
    let doc = host.open_source(&source).unwrap();
    host.set_selections(doc, vec![Region::new(0, 10), Region::new(15, 25)]);

    carve::run(&mut host, &Config::default()).unwrap();

    assert!(out.join("scratch-same title.txt").exists());
    assert!(out.join("scratch-same title-2.txt").exists());
}

#[test]
fn configured_extension_flows_into_names() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("snippets.rs");
    fs::write(&source, "fn helper() {}\n").unwrap();

    let out = dir.path().join("carved");
    let mut host = HeadlessHost::with_out_dir(&out);
    let doc = host.open_source(&source).unwrap();
    host.set_selections(doc, vec![Region::new(0, 14)]);

    let mut config = Config::default();
    config.defaults.extension = "rs".into();
    carve::run(&mut host, &config).unwrap();

    assert!(out.join("snippets-fn helper.rs").exists());
}
