use nnkit_core::nn::init::{xavier, zero};
use nnkit_core::nn::{Layer, FFN};
use nnkit_core::{Graph, NodeId, Tensor};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub struct XorNet {
    pub graph: Graph,
    pub ffn: FFN,
    pub x: NodeId,
    pub params: Vec<NodeId>,
}

/// 2-4-1 tanh/sigmoid network with an L2 loss against the XOR truth table.
#[allow(dead_code)]
pub fn xor_net(seed: u64) -> XorNet {
    let mut graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let x = graph.var(Some(
        Tensor::new(vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0], vec![4, 2]).expect("xor inputs"),
    ));
    let t = graph.var(Some(Tensor::new(vec![0.0, 1.0, 1.0, 0.0], vec![4, 1]).expect("xor targets")));
    let w1 = xavier(&mut graph, &[2, 4], 1.0, &mut rng).expect("w1");
    let b1 = zero(&mut graph, &[1, 4]).expect("b1");
    let w2 = xavier(&mut graph, &[4, 1], 1.0, &mut rng).expect("w2");
    let b2 = zero(&mut graph, &[1, 1]).expect("b2");
    let ffn = FFN::with_seed(
        vec![
            Layer::MatMul { w: w1 },
            Layer::Add { b: b1 },
            Layer::Tanh,
            Layer::MatMul { w: w2 },
            Layer::Add { b: b2 },
            Layer::Sigmoid,
            Layer::L2Loss { target: t },
        ],
        seed,
    );
    XorNet {
        graph,
        ffn,
        x,
        params: vec![w1, b1, w2, b2],
    }
}
