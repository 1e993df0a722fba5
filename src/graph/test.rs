#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::context::CallContext;
    use crate::error::FlowError;
    use crate::graph::{batch_flow, compute_flow, max_flow, BatchFlowResult, FlowResult};
    use crate::options::FlowOptions;
    use crate::types::{Capacity, Graph, Vertex};

    fn diamond() -> Graph<&'static str> {
        Graph::build(vec![("a", "b", 10), ("a", "c", 7), ("b", "d", 9), ("c", "d", 8)]).unwrap()
    }

    fn flows<V: Vertex + Copy>(result: &FlowResult<V>) -> Vec<(V, V, Capacity)> {
        result.used_edges().map(|e| (e.from, e.to, e.flow)).collect()
    }

    #[test]
    fn two_routes() {
        let graph = Graph::build(vec![("S", "A", 10), ("S", "B", 5), ("A", "T", 5), ("B", "T", 10)]).unwrap();
        let result = max_flow(&graph, &"S", &"T").unwrap();
        assert_eq!(result.total, 10);
        assert_eq!(result.augmentations, 2);
    }

    #[test]
    fn single_bottleneck() {
        let graph = Graph::build(vec![("S", "A", 3), ("A", "T", 100)]).unwrap();
        let result = max_flow(&graph, &"S", &"T").unwrap();
        assert_eq!(result.total, 3);
        let cut = result.min_cut.unwrap();
        assert_eq!(cut.capacity, 3);
        assert_eq!(cut.source_side, vec!["S"]);
    }

    #[test]
    fn disconnected_sink() {
        let graph = Graph::build(vec![("S", "A", 10), ("T", "T", 1)]).unwrap();
        let result = max_flow(&graph, &"S", &"T").unwrap();
        assert_eq!(result.total, 0);
        assert_eq!(result.augmentations, 0);
        assert_eq!(result.used_edges().count(), 0);
        assert_eq!(result.min_cut.unwrap().capacity, 0);
    }

    #[test]
    fn source_equals_sink() {
        let graph = Graph::build(vec![("S", "A", 10), ("A", "S", 10)]).unwrap();
        for _ in 0..2 {
            assert_eq!(
                max_flow(&graph, &"S", &"S"),
                Err(FlowError::DegenerateQuery {
                    vertex: "S".to_string()
                })
            );
        }
    }

    #[test]
    fn unknown_vertices() {
        let graph = diamond();
        assert_eq!(
            max_flow(&graph, &"x", &"d"),
            Err(FlowError::UnknownVertex {
                vertex: "x".to_string()
            })
        );
        assert_eq!(
            max_flow(&graph, &"a", &"y"),
            Err(FlowError::UnknownVertex {
                vertex: "y".to_string()
            })
        );
    }

    #[test]
    fn diamond_flow() {
        let result = max_flow(&diamond(), &"a", &"d").unwrap();
        assert_eq!(result.total, 16);
        assert_eq!(
            flows(&result),
            vec![("a", "b", 9), ("a", "c", 7), ("b", "d", 9), ("c", "d", 7)]
        );
        assert_eq!(result.flow(&"a", &"b"), 9);
        assert_eq!(result.flow(&"d", &"a"), 0);
    }

    #[test]
    fn requested_flow_stops_early() {
        let options = FlowOptions::default().with_requested_flow(6);
        let result = compute_flow(&diamond(), &"a", &"d", &options, &CallContext::default()).unwrap();
        assert_eq!(result.total, 6);
        assert_eq!(flows(&result), vec![("a", "b", 6), ("b", "d", 6)]);
        assert!(result.min_cut.is_none());

        let options = FlowOptions::default().with_requested_flow(100);
        let result = compute_flow(&diamond(), &"a", &"d", &options, &CallContext::default()).unwrap();
        assert_eq!(result.total, 16);
        assert!(result.min_cut.is_some());

        let options = FlowOptions::default().with_requested_flow(-1);
        assert_eq!(
            compute_flow(&diamond(), &"a", &"d", &options, &CallContext::default()),
            Err(FlowError::InvalidRequestedFlow { requested: -1 })
        );
    }

    #[test]
    fn augmentation_budget() {
        let options = FlowOptions::default().with_max_augmentations(1);
        assert_eq!(
            compute_flow(&diamond(), &"a", &"d", &options, &CallContext::default()),
            Err(FlowError::BudgetExceeded {
                augmentations: 1,
                flow: 9
            })
        );
        // Exactly enough augmentations is not an error.
        let options = FlowOptions::default().with_max_augmentations(2);
        let result = compute_flow(&diamond(), &"a", &"d", &options, &CallContext::default()).unwrap();
        assert_eq!(result.total, 16);

        let options = FlowOptions::default().with_time_limit(Duration::from_secs(60));
        let result = compute_flow(&diamond(), &"a", &"d", &options, &CallContext::new("timed")).unwrap();
        assert_eq!(result.total, 16);
    }

    #[test]
    fn time_limit() {
        let options = FlowOptions::default().with_time_limit(Duration::ZERO);
        assert_eq!(
            compute_flow(&diamond(), &"a", &"d", &options, &CallContext::default()),
            Err(FlowError::BudgetExceeded {
                augmentations: 0,
                flow: 0
            })
        );
        let result = batch_flow(&diamond(), &["a"], &["d"], &options, &CallContext::default());
        assert!(matches!(result, Err(FlowError::BudgetExceeded { .. })));

        // Without any augmenting path there is nothing to give up on.
        let graph = Graph::build(vec![("a", "b", 1), ("c", "d", 1)]).unwrap();
        let result = compute_flow(&graph, &"a", &"d", &options, &CallContext::default()).unwrap();
        assert_eq!(result.total, 0);
    }

    #[test]
    fn capacities_up_to_the_limit() {
        let quarter = i64::MAX / 4;
        let graph = Graph::build(vec![("s", "a", quarter), ("s", "b", quarter), ("a", "t", quarter), ("b", "t", quarter)])
            .unwrap();
        let result = max_flow(&graph, &"s", &"t").unwrap();
        assert_eq!(result.total, 2 * quarter);
        assert_eq!(result.min_cut.unwrap().capacity, 2 * quarter);

        let graph = Graph::build(vec![("o", "d", i64::MAX)]).unwrap();
        let result = batch_flow(&graph, &["o"], &["d"], &FlowOptions::default(), &CallContext::default()).unwrap();
        assert_eq!(result.total, i64::MAX);
        assert_eq!(result.attribution.attributed(), i64::MAX);
        let cut = result.min_cut.unwrap();
        assert_eq!(cut.capacity, i64::MAX);
        assert_eq!(cut.source_side, vec!["o"]);

        let result = Graph::build(vec![("s", "a", i64::MAX), ("s", "b", i64::MAX)]);
        assert!(matches!(result, Err(FlowError::CapacityOverflow { .. })));
    }

    #[test]
    fn cancels_flow_on_reverse_edge() {
        let graph = Graph::build(vec![
            ("s", "a", 1),
            ("s", "b", 1),
            ("a", "d", 1),
            ("b", "d", 1),
            ("d", "t", 1),
            ("a", "e", 1),
            ("e", "t", 1),
        ])
        .unwrap();
        let result = max_flow(&graph, &"s", &"t").unwrap();
        assert_eq!(result.total, 2);
        assert_eq!(result.augmentations, 2);
        assert_eq!(result.flow(&"a", &"d"), 0);
        assert_eq!(result.flow(&"b", &"d"), 1);
        assert_eq!(result.flow(&"a", &"e"), 1);
    }

    #[test]
    fn parallel_edges_are_summed() {
        let graph = Graph::build(vec![("s", "t", 2), ("s", "t", 3)]).unwrap();
        let result = max_flow(&graph, &"s", &"t").unwrap();
        assert_eq!(result.total, 5);
        assert_eq!(result.augmentations, 1);
        assert_eq!(result.edge_flows.len(), 1);
    }

    #[test]
    fn matrix_input() {
        let graph = Graph::from_matrix(&[
            vec![0, 10, 5, 0],
            vec![0, 0, 0, 5],
            vec![0, 0, 0, 10],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        assert_eq!(max_flow(&graph, &0, &3).unwrap().total, 10);
        assert_eq!(max_flow(&graph, &3, &0).unwrap().total, 0);
    }

    #[test]
    fn graph_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Graph<String>>();

        let graph = diamond();
        let totals: Vec<Capacity> = std::thread::scope(|scope| {
            let handles: Vec<_> = [("a", "d"), ("a", "b"), ("b", "d")]
                .into_iter()
                .map(|(s, t)| {
                    let graph = &graph;
                    scope.spawn(move || max_flow(graph, &s, &t).unwrap().total)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(totals, vec![16, 10, 9]);
    }

    #[test]
    fn batch_through_shared_hub() {
        let graph = Graph::build(vec![
            ("o1", "hub", 8),
            ("o2", "hub", 8),
            ("o2", "w", 4),
            ("hub", "d1", 5),
            ("hub", "d2", 6),
            ("w", "d2", 4),
        ])
        .unwrap();
        let result = batch_flow(
            &graph,
            &["o1", "o2"],
            &["d1", "d2"],
            &FlowOptions::default(),
            &CallContext::default(),
        )
        .unwrap();
        assert_eq!(result.total, 15);
        assert_eq!(result.min_cut.as_ref().unwrap().capacity, 15);
        let origin_sum: Capacity = result.origin_flows.iter().map(|a| a.amount).sum();
        let destination_sum: Capacity = result.destination_flows.iter().map(|a| a.amount).sum();
        assert_eq!(origin_sum, 15);
        assert_eq!(destination_sum, 15);
        assert!(result.attribution.ambiguous);
        assert_eq!(result.attribution.attributed(), 15);
        assert_eq!(result.attribution.unattributed, 0);
        for (attributed, actual) in result.attribution.origin_totals.iter().zip(&result.origin_flows) {
            assert!(attributed.amount <= actual.amount);
        }
    }

    #[test]
    fn batch_rejects_bad_queries() {
        fn run(
            origins: &[&'static str],
            destinations: &[&'static str],
        ) -> Result<BatchFlowResult<&'static str>, FlowError> {
            batch_flow(&diamond(), origins, destinations, &FlowOptions::default(), &CallContext::default())
        }
        assert_eq!(run(&[], &["d"]).unwrap_err(), FlowError::EmptyQuery);
        assert_eq!(
            run(&["a", "b"], &["b", "d"]).unwrap_err(),
            FlowError::DegenerateQuery {
                vertex: "b".to_string()
            }
        );
        assert_eq!(
            run(&["a"], &["z"]).unwrap_err(),
            FlowError::UnknownVertex {
                vertex: "z".to_string()
            }
        );
        // Duplicates are ignored.
        let result = run(&["a", "a"], &["d"]).unwrap();
        assert_eq!(result.origins, vec!["a"]);
        assert_eq!(result.total, 16);
    }

    struct XorShift(u64);

    impl XorShift {
        fn below(&mut self, n: u64) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0 % n
        }
    }

    fn random_graph(rng: &mut XorShift) -> Graph<usize> {
        let n = 3 + rng.below(5) as usize;
        let mut matrix = vec![vec![0; n]; n];
        for _ in 0..(2 * n + rng.below(n as u64) as usize) {
            let from = rng.below(n as u64) as usize;
            let to = rng.below(n as u64) as usize;
            if from != to {
                matrix[from][to] += rng.below(10) as Capacity;
            }
        }
        Graph::from_matrix(&matrix).unwrap()
    }

    /// Smallest s-t cut by trying every vertex subset.
    fn brute_force_min_cut(graph: &Graph<usize>, source: usize, sink: usize) -> Capacity {
        let n = graph.vertex_count();
        (0u32..(1 << n))
            .filter(|set| set & (1 << source) != 0 && set & (1 << sink) == 0)
            .map(|set| {
                graph
                    .edges()
                    .iter()
                    .filter(|e| set & (1 << e.from) != 0 && set & (1 << e.to) == 0)
                    .map(|e| e.capacity)
                    .sum::<Capacity>()
            })
            .min()
            .unwrap()
    }

    fn check_flow_properties(graph: &Graph<usize>, result: &FlowResult<usize>) {
        let mut balance: HashMap<usize, Capacity> = HashMap::new();
        for e in &result.edge_flows {
            assert!(e.flow >= 0 && e.flow <= e.capacity, "{e:?}");
            *balance.entry(e.from).or_default() += e.flow;
            *balance.entry(e.to).or_default() -= e.flow;
        }
        for v in graph.vertices() {
            let net = balance.get(v).copied().unwrap_or(0);
            if *v == result.source {
                assert_eq!(net, result.total);
            } else if *v == result.sink {
                assert_eq!(net, -result.total);
            } else {
                assert_eq!(net, 0, "conservation violated at {v}");
            }
        }
        let cut = result.min_cut.as_ref().unwrap();
        assert_eq!(cut.capacity, result.total);
        assert!(cut.on_source_side(&result.source));
        assert!(!cut.on_source_side(&result.sink));
        let crossing: Capacity = graph
            .edges()
            .iter()
            .filter(|e| cut.on_source_side(&e.from) && !cut.on_source_side(&e.to))
            .map(|e| e.capacity)
            .sum();
        assert_eq!(crossing, result.total);
    }

    #[test]
    fn random_graphs_satisfy_flow_properties() {
        let mut rng = XorShift(0x2545_f491_4f6c_dd1d);
        for _ in 0..40 {
            let graph = random_graph(&mut rng);
            let n = graph.vertex_count();
            for s in 0..n {
                for t in 0..n {
                    if s == t {
                        continue;
                    }
                    let result = max_flow(&graph, &s, &t).unwrap();
                    check_flow_properties(&graph, &result);
                    assert_eq!(result.total, brute_force_min_cut(&graph, s, t));
                    assert_eq!(max_flow(&graph, &s, &t).unwrap(), result);
                }
            }
        }
    }

    #[test]
    fn raising_a_capacity_never_lowers_the_flow() {
        let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);
        for _ in 0..30 {
            let graph = random_graph(&mut rng);
            if graph.edge_count() == 0 {
                continue;
            }
            let raised = rng.below(graph.edge_count() as u64) as usize;
            let bumped = Graph::from_edges(graph.edges().iter().enumerate().map(|(i, e)| {
                let mut e = e.clone();
                if i == raised {
                    e.capacity += 5;
                }
                e
            }))
            .unwrap();
            let n = graph.vertex_count();
            for s in 0..n {
                for t in (0..n).filter(|t| *t != s) {
                    if !bumped.contains(&s) || !bumped.contains(&t) {
                        continue;
                    }
                    let before = max_flow(&graph, &s, &t).unwrap().total;
                    let after = max_flow(&bumped, &s, &t).unwrap().total;
                    assert!(after >= before);
                }
            }
        }
    }

    #[test]
    fn random_batches_attribute_within_bounds() {
        let mut rng = XorShift(0x0123_4567_89ab_cdef);
        for _ in 0..40 {
            let graph = random_graph(&mut rng);
            let n = graph.vertex_count();
            let split = 1 + rng.below(n as u64 - 1) as usize;
            let origins: Vec<usize> = (0..split).collect();
            let destinations: Vec<usize> = (split..n).collect();
            let result = batch_flow(
                &graph,
                &origins,
                &destinations,
                &FlowOptions::default(),
                &CallContext::default(),
            )
            .unwrap();
            assert_eq!(result.min_cut.as_ref().unwrap().capacity, result.total);
            let attribution = &result.attribution;
            assert_eq!(attribution.attributed() + attribution.unattributed, result.total);
            for pair in &attribution.pairs {
                let isolated = max_flow(&graph, &pair.origin, &pair.destination).unwrap().total;
                assert!(pair.amount <= isolated);
            }
            for (attributed, actual) in attribution.origin_totals.iter().zip(&result.origin_flows) {
                assert_eq!(attributed.vertex, actual.vertex);
                assert!(attributed.amount <= actual.amount);
            }
            for (attributed, actual) in attribution
                .destination_totals
                .iter()
                .zip(&result.destination_flows)
            {
                assert!(attributed.amount <= actual.amount);
            }
        }
    }
}
