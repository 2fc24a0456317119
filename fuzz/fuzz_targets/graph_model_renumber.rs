#![no_main]

use libfuzzer_sys::fuzz_target;

use bitgraph::infra::{
    arbitrary::MutOpsSeq,
    modeling::{Model, ModelParams},
};

fuzz_target!(|ops: MutOpsSeq| {
    let mut model = Model::new(ModelParams::default().renumber());
    let mut graph = model.graph();

    for op in ops {
        let expected = op.clone().apply(&mut model);
        let actual = op.apply(&mut graph);

        assert_eq!(actual, expected);
        assert!(model.is_equivalent(&graph), "{graph}");
    }
});
