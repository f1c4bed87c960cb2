use crate::cluster::Cluster;

#[test]
fn test_cluster_set_semantics() {
    let mut c = Cluster::new(4, 4);
    assert!(c.add("Q2"));
    assert!(c.add("Q1"));
    assert!(!c.add("Q2"));

    assert_eq!(c.len(), 2);
    assert!(c.contains("Q1"));
    assert!(!c.contains("Q3"));
    assert_eq!(c.iter().collect::<Vec<_>>(), vec!["Q1", "Q2"]);
}

#[test]
fn test_cluster_extend_and_display() {
    let mut c = Cluster::new(7, 3);
    c.extend(["a", "b", "a", "c"]);
    assert_eq!(c.len(), 3);
    assert_eq!(c.identifier(), 7);
    assert_eq!(c.dimension(), 3);
    assert_eq!(c.to_string(), "cluster 7 (dimension 3): 3 members");
    assert!(Cluster::new(0, 0).is_empty());
}

#[test]
fn test_cluster_json_shape() {
    let mut c = Cluster::new(1, 1);
    c.extend(["x", "y"]);
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["dimension"], 1);
    assert_eq!(json["members"], serde_json::json!(["x", "y"]));

    let back: Cluster = serde_json::from_value(json).unwrap();
    assert_eq!(back, c);
}
