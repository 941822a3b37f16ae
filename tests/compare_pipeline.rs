use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use funcbench::reconcile::{run_compare, CompareConfig};
use funcbench::visualization::{run_visualize, VisualizeConfig};
use funcbench::{
    correlate, load_table, merge, normalize_identifier, top_n_overlap, AbundanceRecord,
    DuplicatePolicy, MergedRow, TableError,
};

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn write_gz(path: &Path, content: &str) {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(content.as_bytes()).unwrap();
    fs::write(path, enc.finish().unwrap()).unwrap();
}

fn config(dir: &Path, humann: PathBuf, picrust: PathBuf, sample: &str) -> CompareConfig {
    CompareConfig {
        humann,
        picrust,
        picrust_sample: sample.to_string(),
        id_prefix: "K".to_string(),
        duplicates: DuplicatePolicy::First,
        top_n: 3,
        out_table: dir.join("results/tables/KO_compare.tsv"),
        out_png: dir.join("results/figures/KO_scatter.png"),
        summary_json: Some(dir.join("results/summary.json")),
    }
}

#[test]
fn single_shared_ko_skips_correlation() {
    let dir = tempfile::tempdir().unwrap();
    let humann = dir.path().join("humann.tsv");
    let picrust = dir.path().join("picrust.tsv");
    write(&humann, "K00001\t10.0\nK00002\t0.0\n");
    write(&picrust, "K00001\t5.0\nK00003\t2.0\n");

    let a = load_table(&humann, 0, 1).unwrap();
    let b = load_table(&picrust, 0, 1).unwrap();
    assert_eq!(a.records, vec![AbundanceRecord::new("K00001", 10.0)]);
    assert_eq!(
        b.records,
        vec![AbundanceRecord::new("K00001", 5.0), AbundanceRecord::new("K00003", 2.0)]
    );

    let merged = merge(&a, &b, DuplicatePolicy::First).unwrap();
    assert_eq!(
        merged.rows,
        vec![MergedRow {
            identifier: "K00001".into(),
            value_a: 10.0,
            value_b: 5.0
        }]
    );
    assert!(correlate(&merged).is_none());
    assert_eq!(top_n_overlap(&a, &b, 5), top_n_overlap(&b, &a, 5));
    assert_eq!(normalize_identifier("ko:K00001"), "K00001");
}

#[test]
fn full_comparison_writes_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let humann = dir.path().join("KO_cpm_unstratified.tsv");
    let picrust = dir.path().join("KO_unstrat_annot.tsv.gz");
    write(
        &humann,
        "# Gene Family\tsample_Abundance-CPM\n\
         UNMAPPED\t90000\n\
         K00001\t10\n\
         K00002\t20\n\
         K00003\t0\n\
         K00004\t40\n\
         K00005\t35\n",
    );
    write_gz(
        &picrust,
        "function\tdescription\tsoil_rice\tsoil_shrimp\n\
         ko:K00001\ta\t1.5\t3\n\
         ko:K00002\tb\t2.5\t0\n\
         ko:K00004\tc\t4.5\t1\n\
         ko:K00005\td\t0\t1\n\
         ko:K00009\te\t9.0\t1\n",
    );

    let cfg = config(dir.path(), humann, picrust, "soil_rice");
    let summary = run_compare(&cfg).unwrap();

    assert_eq!(summary.humann_rows, 4);
    assert_eq!(summary.picrust_rows, 4);
    assert_eq!(summary.merged_rows, 3);
    let corr = summary.correlations.expect("three shared KOs");
    assert_eq!(corr.spearman.coefficient, 1.0);
    assert!((-1.0..=1.0).contains(&corr.pearson.coefficient));
    // HUMAnN top 3: K00004, K00005, K00002; PICRUSt2 top 3: K00009, K00004, K00002
    assert_eq!(summary.top_n_overlap, 2);

    let table = fs::read_to_string(&cfg.out_table).unwrap();
    assert_eq!(
        table,
        "KO\tHUMANN\tPICRUSt2\nK00001\t10\t1.5\nK00002\t20\t2.5\nK00004\t40\t4.5\n"
    );
    assert!(cfg.out_png.exists());

    let summary_path = cfg.summary_json.as_ref().unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(summary_path).unwrap()).unwrap();
    assert_eq!(json["merged_rows"], 3);
    assert_eq!(json["duplicates"], "first");
}

#[test]
fn absent_sample_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let humann = dir.path().join("humann.tsv");
    let picrust = dir.path().join("picrust.tsv");
    write(&humann, "K00001\t10.0\n");
    write(&picrust, "function\tdescription\tsoil_rice\nko:K00001\tx\t1\n");

    let err = run_compare(&config(dir.path(), humann, picrust, "soil_wheat")).unwrap_err();
    let table_err = err.downcast_ref::<TableError>().expect("schema error");
    assert!(matches!(
        table_err,
        TableError::MissingColumn { column, .. } if column == "soil_wheat"
    ));
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let picrust = dir.path().join("picrust.tsv");
    write(&picrust, "function\tsoil_rice\nK1\t1\n");

    let missing = dir.path().join("nope.tsv");
    let err = run_compare(&config(dir.path(), missing, picrust, "soil_rice")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TableError>(),
        Some(TableError::MissingFile(_))
    ));
}

#[test]
fn visualization_writes_every_figure() {
    let dir = tempfile::tempdir().unwrap();
    let ec = dir.path().join("EC_cpm_named.tsv");
    let rxn = dir.path().join("RXN_cpm_named.tsv");
    write(
        &ec,
        "EC_ID\tCPM\tName\n\
         1.1.1.1\t50\talcohol dehydrogenase\n\
         2.7.7.7\t30\tDNA polymerase\n\
         3.2.1.4\t20\tcellulase\n\
         UNCLASSIFIED\t5\tunknown\n",
    );
    write(&rxn, "RXN_ID\tCPM\tName\nRXN-1\t4\ta\nRXN-2\t8\tb\n");

    let outdir = dir.path().join("figures");
    let written = run_visualize(&VisualizeConfig {
        ec,
        rxn,
        top_n: 3,
        outdir: outdir.clone(),
    })
    .unwrap();

    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "EC_top3.png",
            "RXN_top3.png",
            "EC_heatmap.png",
            "RXN_heatmap.png",
            "EC_class_stacked.png"
        ]
    );
    assert!(written.iter().all(|p| p.starts_with(&outdir) && p.exists()));
}
