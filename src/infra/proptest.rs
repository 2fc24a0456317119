use proptest::{
    collection::vec,
    prelude::*,
    strategy::{BoxedStrategy, NewTree, ValueTree},
    test_runner::TestRunner,
};

use crate::{
    core::BitSet,
    graph::{Graph, GraphConfig, RemovalPolicy},
};

pub fn bit_set(max_value: usize, max_len: usize) -> impl Strategy<Value = BitSet> {
    vec(0..=max_value, 0..=max_len).prop_map(|values| values.into_iter().collect())
}

pub fn graph() -> GraphStrategy {
    GraphStrategy::new()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    max_size: usize,
    density: f32,
    allow_loops: bool,
    removal_policy: RemovalPolicy,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            max_size: 64,
            density: 0.25,
            allow_loops: false,
            removal_policy: RemovalPolicy::Renumber,
        }
    }
}

impl StrategyParams {
    pub fn max_size(self, value: usize) -> Self {
        Self {
            max_size: value,
            ..self
        }
    }

    /// Upper bound on the ratio of generated edges to `n * n`.
    pub fn density(self, value: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&value),
            "density must be in [0, 1] range"
        );

        Self {
            density: value,
            ..self
        }
    }

    pub fn allow_loops(self) -> Self {
        Self {
            allow_loops: true,
            ..self
        }
    }

    pub fn removal_policy(self, value: RemovalPolicy) -> Self {
        Self {
            removal_policy: value,
            ..self
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphStrategy {
    params: StrategyParams,
}

macro_rules! delegate_builder_fn {
    ($name:ident$(, $param:ident: $param_type:ty)*) => {
        #[doc = concat!("See [StrategyParams::", stringify!($name), "](StrategyParams::", stringify!($name), ") for details.")]
        pub fn $name(self, $($param: $param_type),*) -> Self {
            Self {
                params: self.params.$name($($param,)*),
            }
        }
    }
}

impl GraphStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: StrategyParams) -> Self {
        Self { params }
    }

    delegate_builder_fn!(max_size, value: usize);
    delegate_builder_fn!(density, value: f32);
    delegate_builder_fn!(allow_loops);
    delegate_builder_fn!(removal_policy, value: RemovalPolicy);

    fn inner(&self) -> BoxedStrategy<Graph> {
        let params = self.params.clone();

        (0..=params.max_size)
            .prop_flat_map(move |n| {
                let max_edges = ((n * n) as f32 * params.density).ceil() as usize;
                // Unused when there are no nodes, but the range must not be
                // empty.
                let bound = n.max(1);
                let allow_loops = params.allow_loops;
                let config = GraphConfig::new().removal_policy(params.removal_policy);

                vec((0..bound, 0..bound), 0..=max_edges).prop_map(move |edges| {
                    let mut graph = Graph::with_config(n, config.clone());

                    for (src, dst) in edges {
                        if allow_loops || src != dst {
                            graph.insert_edge(src, dst);
                        }
                    }

                    graph
                })
            })
            .boxed()
    }
}

impl Strategy for GraphStrategy {
    type Tree = Box<dyn ValueTree<Value = Graph>>;
    type Value = Graph;

    fn new_tree(&self, runner: &mut TestRunner) -> NewTree<Self> {
        self.inner().new_tree(runner)
    }
}
