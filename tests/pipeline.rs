use std::path::{Path, PathBuf};

use hirm_layout::format::{parse_clusters, write_clusters};
use hirm_layout::plot::to_toon;
use hirm_layout::{IngestConfig, IngestError, load_dataset, order_all, order_for_domain};

const SCHEMA: &str = "\
# two domains, one binary relation across them
black ~ bernoulli(animals)
white ~ bernoulli(animals)
edible ~ bernoulli(plants)
eats ~ bernoulli(animals, plants)
";

const OBSERVATIONS: &str = "\
1,black,cat
0,black,ant
1,white,bee
1,edible,fig
0,edible,oak
1,eats,ant,fig
0,eats,gnu,oak
";

const CLUSTERS: &str = "\
0 black white edible eats

cluster=0
animals 0 cat ant bee
plants 4 oak elm ash
animals 1 dog
plants 5 yew fig fir
animals 2 gnu eel fox
plants 6 ivy rye pea
";

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn files_in_layout_out() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "zoo.schema", SCHEMA);
    let obs = write(dir.path(), "zoo.obs", OBSERVATIONS);
    let clusters = write(dir.path(), "zoo.hirm", CLUSTERS);

    let ds = load_dataset(&schema, &obs, &clusters, &IngestConfig::default()).unwrap();
    assert_eq!(ds.schema.len(), 4);
    assert_eq!(ds.observations.len(), 7);

    let cluster = &ds.clusters[0];
    let o = order_all(cluster);
    assert_eq!(
        o.entities,
        vec![
            "ant", "bee", "cat", "dog", "eel", "fox", "gnu", //
            "ash", "elm", "oak", "fig", "fir", "yew", "ivy", "pea", "rye",
        ]
    );
    assert_eq!(o.major_dividers, vec![7]);
    assert_eq!(o.minor_dividers, vec![3, 4, 10, 13]);

    let plants = order_for_domain(cluster, "plants");
    assert_eq!(plants.dividers, vec![3, 6]);

    let plots = ds.plan();
    assert_eq!(plots.len(), 1);

    let unary = plots[0].unary.as_ref().unwrap();
    assert_eq!(unary.relations, vec!["black", "edible", "white"]);
    assert_eq!(unary.matrix.rows, 16);
    // cat is row 2, black is column 0
    assert_eq!(unary.matrix.get(2, 0), Some("1"));
    // fig is row 10, edible is column 1
    assert_eq!(unary.matrix.get(10, 1), Some("1"));
    assert_eq!(unary.matrix.get(2, 1), None);

    let eats = &plots[0].binary[0];
    assert_eq!((eats.row_domain.as_str(), eats.col_domain.as_str()), ("animals", "plants"));
    assert_eq!((eats.matrix.rows, eats.matrix.cols), (7, 9));
    assert_eq!(eats.matrix.get(0, 3), Some("1"));
    assert_eq!(eats.matrix.get(6, 2), Some("0"));
    assert_eq!(eats.matrix.missing_count(), 61);

    let toon = to_toon(&plots).unwrap();
    assert!(toon.contains("eats"));
}

#[test]
fn cluster_file_rewrites_with_another_header_key() {
    let clusters = parse_clusters(CLUSTERS, &IngestConfig::default()).unwrap();
    let text = write_clusters(&clusters, "irm");
    assert!(text.contains("irm=0\n"));

    let strict = IngestConfig {
        header_key: "irm".to_string(),
        strict_header_key: true,
        ..IngestConfig::default()
    };
    assert_eq!(parse_clusters(&text, &strict).unwrap(), clusters);
    assert!(parse_clusters(CLUSTERS, &strict).is_err());
}

#[test]
fn a_bad_file_yields_one_error_and_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "zoo.schema", SCHEMA);
    let obs = write(dir.path(), "zoo.obs", OBSERVATIONS);
    let clusters = write(
        dir.path(),
        "zoo.hirm",
        "0 black white edible eats\n\ncluster=0\nanimals 0 cat\n\ncluster=5\nplants 0 oak\n",
    );

    let err = load_dataset(&schema, &obs, &clusters, &IngestConfig::default()).unwrap_err();
    assert!(err.to_string().contains("zoo.hirm"));
    match err.root() {
        IngestError::DanglingClusterReference { cluster_id } => assert_eq!(cluster_id, "5"),
        other => panic!("unexpected error: {}", other),
    }
}
