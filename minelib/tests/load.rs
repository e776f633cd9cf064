use std::{path::PathBuf, sync::Arc};

use minelib::{
    load, load_all,
    parser::{read_precedence, structs::AttributeValue},
    BatchOptions, Instance, InstanceKind, LoadError, LoadOptions, PrecedenceSource,
};

fn instance(file: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "..", "instances", file]
        .iter()
        .collect()
}

#[test]
fn load_by_extension() {
    for (file, kind) in [
        ("sample.blocks", InstanceKind::BlockModel),
        ("sample.prec", InstanceKind::Precedence),
        ("sample.upit", InstanceKind::Upit),
        ("sample.cpit", InstanceKind::Cpit),
        ("sample.pcpsp", InstanceKind::Pcpsp),
    ] {
        let loaded = load(instance(file), &LoadOptions::default()).unwrap();
        assert_eq!(loaded.kind(), kind, "{file}");
    }
}

#[test]
fn block_model_attribute_names() {
    let options = LoadOptions {
        attribute_names: vec!["tonnage".to_owned(), "grade".to_owned(), "rock".to_owned()],
        ..Default::default()
    };

    let Instance::BlockModel(model) = load(instance("sample.blocks"), &options).unwrap() else {
        panic!("expected a block model");
    };

    assert_eq!(
        model.attribute(0, "rock"),
        Some(&AttributeValue::Text("waste".to_owned()))
    );
    assert_eq!(
        model.attribute(4, "grade"),
        Some(&AttributeValue::Number(f64::INFINITY))
    );
}

#[test]
fn sibling_precedence_is_attached() {
    let options = LoadOptions {
        precedence: PrecedenceSource::Sibling,
        ..Default::default()
    };

    let loaded = load(instance("sample.upit"), &options).unwrap();

    let precedence = loaded.precedence().unwrap();
    assert_eq!(precedence.num_arcs(), 7);

    let summary = loaded.summary();
    assert_eq!(summary.name.as_deref(), Some("sample"));
    assert_eq!(summary.num_arcs, Some(7));
    assert_eq!(summary.num_ranks, Some(4));
    assert_eq!(summary.positive_total, Some(325.0));
}

#[test]
fn kind_override_and_unknown_extension() {
    let options = LoadOptions {
        kind: Some(InstanceKind::Precedence),
        ..Default::default()
    };
    let loaded = load(instance("sample.prec"), &options).unwrap();
    assert_eq!(loaded.kind(), InstanceKind::Precedence);

    let err = load("instances/sample.txt", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::UnknownKind(_)));
}

#[test]
fn missing_file_is_parse_io_error() {
    let err = load(instance("missing.cpit"), &LoadOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        LoadError::Parse(minelib::parser::MineLibParseError::Io(_))
    ));
}

#[test]
fn shared_precedence_is_one_allocation() {
    let graph = Arc::new(read_precedence(instance("sample.prec")).unwrap());
    let options = LoadOptions {
        precedence: PrecedenceSource::Shared(Arc::clone(&graph)),
        ..Default::default()
    };

    let Instance::Cpit(cpit) = load(instance("sample.cpit"), &options).unwrap() else {
        panic!("expected a cpit instance");
    };
    let Instance::Pcpsp(pcpsp) = load(instance("sample.pcpsp"), &options).unwrap() else {
        panic!("expected a pcpsp instance");
    };

    assert!(Arc::ptr_eq(cpit.precedence.as_ref().unwrap(), &graph));
    assert!(Arc::ptr_eq(pcpsp.precedence.as_ref().unwrap(), &graph));
}

#[test]
fn batch_keeps_input_order() {
    let paths: Vec<PathBuf> = ["sample.pcpsp", "sample.upit", "missing.upit", "sample.cpit"]
        .into_iter()
        .map(instance)
        .collect();
    let options = LoadOptions {
        precedence: PrecedenceSource::Path(instance("sample.prec")),
        ..Default::default()
    };

    for parallel in [true, false] {
        let batch = BatchOptions {
            parallel,
            threads: 2,
        };

        let results = load_all(&paths, &options, &batch).unwrap();

        assert_eq!(results.len(), 4);
        for (result, path) in results.iter().zip(&paths) {
            assert_eq!(&result.path, path);
        }

        let kinds: Vec<Option<InstanceKind>> = results
            .iter()
            .map(|result| result.summary.as_ref().ok().map(|summary| summary.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(InstanceKind::Pcpsp),
                Some(InstanceKind::Upit),
                None,
                Some(InstanceKind::Cpit)
            ]
        );
        assert_eq!(
            results[3].summary.as_ref().unwrap().num_arcs,
            Some(7)
        );
    }
}

#[test]
fn batch_fails_on_unreadable_shared_precedence() {
    let options = LoadOptions {
        precedence: PrecedenceSource::Path(instance("missing.prec")),
        ..Default::default()
    };

    let err = load_all(&[instance("sample.upit")], &options, &BatchOptions::default()).unwrap_err();

    assert!(matches!(err, LoadError::Parse(_)));
}
