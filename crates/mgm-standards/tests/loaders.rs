use std::fs;

use mgm_model::{ChoiceKind, DataType};
use mgm_standards::{
    Authorizer, DigestAllowList, SchemaLoadError, default_schema_path, load_schema, user_digest,
};

#[test]
fn loads_bundled_schema() {
    let registry = load_schema(&default_schema_path()).expect("load bundled schema");
    insta::assert_snapshot!(registry.fields().join("\n"), @r"
    sampleID
    project_name
    collection_date
    run_date
    locality
    latitude
    longitude
    depth
    elevation
    source_type
    env_medium
    host_taxid
    replicates
    if_repeated
    seq_platform
    library_strategy
    target_gene
    primers
    dna_concentration
    storage_conditions
    collector
    notes
    ");

    let if_repeated = registry.spec("if_repeated").expect("if_repeated field");
    assert_eq!(if_repeated.choice_kind, ChoiceKind::Fixed);
    assert_eq!(if_repeated.allowed_values, vec!["y", "n"]);
    assert_eq!(
        registry.spec("replicates").unwrap().data_type,
        DataType::Int
    );
    assert_eq!(registry.date_fields(), vec!["collection_date", "run_date"]);
    assert_eq!(registry.fingerprint().map(str::len), Some(64));
}

#[test]
fn missing_schema_source_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_schema(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, SchemaLoadError::Io { .. }));
}

#[test]
fn fingerprint_tracks_source_bytes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("schema.csv");
    fs::write(&path, "field,datatype\nsampleID,string\n").unwrap();
    let first = load_schema(&path).unwrap();
    fs::write(&path, "field,datatype\nsampleID,string\ndepth,float\n").unwrap();
    let second = load_schema(&path).unwrap();
    assert_ne!(first.fingerprint(), second.fingerprint());
}

#[test]
fn loads_allow_list_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("allowlist.txt");
    fs::write(&path, format!("{}\n", user_digest("lab-salt", "alice"))).unwrap();

    let list = DigestAllowList::load(&path, "lab-salt").expect("load allow-list");
    assert!(list.is_authorized("alice"));
    assert!(!list.is_authorized("bob"));

    let wrong_salt = DigestAllowList::load(&path, "other").unwrap();
    assert!(!wrong_salt.is_authorized("alice"));
}
