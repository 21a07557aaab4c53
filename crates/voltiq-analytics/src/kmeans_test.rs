use super::*;

/// Always returns the same draw. `0.999_999` leaves a Fisher–Yates shuffle as
/// the identity, so the first `k` projects seed the centroids.
struct Fixed(f64);

impl RandomSource for Fixed {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

fn first_k() -> Fixed {
    Fixed(0.999_999)
}

fn project(name: &str, margin: f64, days: f64, recovery: f64) -> ServiceProfitabilityRecord {
    ServiceProfitabilityRecord {
        project_name: Some(name.to_string()),
        service_name: Some("Panel Upgrade".to_string()),
        avg_profit_margin_pct: margin,
        days_to_completion: days,
        payment_recovery_days: recovery,
        total_revenue: 10_000.0,
        total_cost: 7_000.0,
        total_profit: 3_000.0,
        ..Default::default()
    }
}

/// Three well-separated groups, interleaved so indices 0..3 hold one of each.
fn three_groups() -> Vec<ServiceProfitabilityRecord> {
    let mut out = Vec::new();
    for i in 0..4 {
        let jitter = f64::from(i);
        out.push(project(&format!("strong-{i}"), 40.0 + jitter, 30.0 + jitter, 15.0 + jitter));
        out.push(project(&format!("mid-{i}"), 20.0 + jitter, 60.0 + jitter, 45.0 + jitter));
        out.push(project(&format!("weak-{i}"), -5.0 + jitter, 120.0 + jitter, 90.0 + jitter));
    }
    out
}

#[test]
fn normalize_rescales_to_unit_interval() {
    assert_eq!(normalize(&[0.0, 5.0, 10.0]), vec![0.0, 0.5, 1.0]);
    assert_eq!(normalize(&[-10.0, 10.0]), vec![0.0, 1.0]);
}

#[test]
fn normalize_constant_column_is_zero() {
    assert_eq!(normalize(&[7.0, 7.0, 7.0]), vec![0.0, 0.0, 0.0]);
    assert!(normalize(&[]).is_empty());
}

#[test]
fn zero_clusters_is_an_error() {
    let err = perform_kmeans_clustering(&three_groups(), 0, &mut first_k()).unwrap_err();
    assert_eq!(err, ClusterError::ZeroClusters);
}

#[test]
fn zero_iterations_is_an_error() {
    let config = KMeansConfig {
        k: 3,
        max_iterations: 0,
    };
    let err = perform_kmeans_clustering_with(&three_groups(), &config, &mut first_k()).unwrap_err();
    assert_eq!(err, ClusterError::ZeroIterations);
}

#[test]
fn empty_input_is_empty_result() {
    let result = perform_kmeans_clustering(&[], 3, &mut first_k()).unwrap();
    assert!(result.projects.is_empty());
    assert!(result.summaries.is_empty());
}

#[test]
fn separated_groups_get_ranked_labels() {
    let projects = three_groups();
    let result = perform_kmeans_clustering(&projects, 3, &mut first_k()).unwrap();
    assert!(result.converged);

    for cp in &result.projects {
        let name = cp.project.project_label();
        let expected = if name.starts_with("strong") {
            "High Performer"
        } else if name.starts_with("mid") {
            "Good"
        } else {
            "Needs Attention"
        };
        assert_eq!(cp.label, expected, "{name}");
    }

    let counts: Vec<usize> = result.summaries.iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![4, 4, 4]);
    assert!((result.summaries[0].avg_profit_margin - 41.5).abs() < 1e-9);
    assert!((result.summaries[2].avg_days_to_completion - 121.5).abs() < 1e-9);
    assert_eq!(result.summaries[1].total_revenue, 40_000.0);
}

#[test]
fn output_preserves_input_order() {
    let projects = three_groups();
    let result = perform_kmeans_clustering(&projects, 3, &mut SeededRandom::new(11)).unwrap();
    let names: Vec<&str> = result.projects.iter().map(|cp| cp.project.project_label()).collect();
    let expected: Vec<&str> = projects
        .iter()
        .map(ServiceProfitabilityRecord::project_label)
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn every_project_lands_in_exactly_one_cluster() {
    let projects = three_groups();
    for seed in 0..20 {
        let result = perform_kmeans_clustering(&projects, 3, &mut SeededRandom::new(seed)).unwrap();
        assert_eq!(result.projects.len(), projects.len());
        assert!(result.projects.iter().all(|cp| cp.cluster < 3));
        let total: usize = result.summaries.iter().map(|s| s.count).sum();
        assert_eq!(total, projects.len());
        assert!(result.iterations <= 50);
    }
}

#[test]
fn summaries_are_ordered_by_descending_margin() {
    let projects = three_groups();
    for seed in 0..20 {
        let result = perform_kmeans_clustering(&projects, 4, &mut SeededRandom::new(seed)).unwrap();
        let ids: Vec<usize> = result.summaries.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        let non_empty: Vec<&ClusterSummary> =
            result.summaries.iter().filter(|s| s.count > 0).collect();
        for pair in non_empty.windows(2) {
            assert!(pair[0].avg_profit_margin >= pair[1].avg_profit_margin);
        }
    }
}

#[test]
fn same_seed_same_result() {
    let projects = three_groups();
    let a = perform_kmeans_clustering(&projects, 3, &mut SeededRandom::new(99)).unwrap();
    let b = perform_kmeans_clustering(&projects, 3, &mut SeededRandom::new(99)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn k_larger_than_input_is_clamped() {
    let projects = vec![project("a", 10.0, 10.0, 10.0), project("b", 30.0, 50.0, 20.0)];
    let result = perform_kmeans_clustering(&projects, 3, &mut first_k()).unwrap();
    assert_eq!(result.summaries.len(), 2);
    assert_eq!(result.projects[1].label, "High Performer");
    assert_eq!(result.projects[0].label, "Good");
}

#[test]
fn identical_points_tie_to_first_centroid_and_empty_cluster_ranks_last() {
    let projects = vec![
        project("a", 25.0, 40.0, 30.0),
        project("b", 25.0, 40.0, 30.0),
        project("c", 25.0, 40.0, 30.0),
    ];
    let result = perform_kmeans_clustering(&projects, 2, &mut first_k()).unwrap();
    assert!(result.projects.iter().all(|cp| cp.cluster == 0));
    assert_eq!(result.summaries[0].label, "High Performer");
    assert_eq!(result.summaries[0].count, 3);

    let empty = &result.summaries[1];
    assert_eq!(empty.label, "Good");
    assert_eq!(empty.count, 0);
    assert_eq!(empty.avg_profit_margin, 0.0);
    assert_eq!(empty.total_revenue, 0.0);
}

#[test]
fn ranks_beyond_four_use_numbered_labels() {
    let projects: Vec<_> = (0..5)
        .map(|i| {
            let v = f64::from(i) * 10.0;
            project(&format!("p{i}"), 50.0 - v, 10.0 + v, 5.0 + v)
        })
        .collect();
    let result = perform_kmeans_clustering(&projects, 5, &mut first_k()).unwrap();
    let labels: Vec<&str> = result.projects.iter().map(|cp| cp.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["High Performer", "Good", "Needs Attention", "At Risk", "Cluster 5"]
    );
}

#[test]
fn iteration_cap_is_respected() {
    let config = KMeansConfig {
        k: 3,
        max_iterations: 1,
    };
    let result = perform_kmeans_clustering_with(&three_groups(), &config, &mut first_k()).unwrap();
    assert_eq!(result.iterations, 1);
    assert!(!result.converged);
}

#[test]
fn chart_points_carry_raw_values() {
    let projects = three_groups();
    let result = perform_kmeans_clustering(&projects, 3, &mut first_k()).unwrap();
    let points = prepare_clustering_chart_data(&result);
    assert_eq!(points.len(), projects.len());

    let first = &points[0];
    assert_eq!(first.name, "strong-0");
    assert_eq!(first.service, "Panel Upgrade");
    assert_eq!(first.x, 30.0);
    assert_eq!(first.y, 40.0);
    assert_eq!(first.z, 15.0);
    assert_eq!(first.revenue, 10_000.0);
    assert_eq!(first.cluster, 0);
    assert_eq!(first.label, "High Performer");
}
