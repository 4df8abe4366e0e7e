//! Topology persistence.
//!
//! A topology is stored as a JSON array of `{"op": name, "args": [...]}`
//! records, one per [`Layer`]. Literal arguments are plain JSON numbers and
//! booleans. Node arguments are written as nested lists holding the node's
//! current value, or `null` for a node without a value. A node that appears
//! more than once is written in full the first time and as `{"ref": k}`
//! afterwards, where `k` counts node arguments in the order they are written,
//! so shared parameters are still shared after loading. L2Reg writes its
//! parameters as a JSON array of node arguments.
//!
//! Only topology and parameter values are persisted. Gradients and the
//! operator nodes of a forward pass are not. [`save`] and [`load`] gzip the
//! JSON text on disk; [`to_json`] and [`from_json`] work in memory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::nn::layer::Layer;
use crate::tensor::Tensor;

/// Suffix appended to paths given to [`save`] and [`load`].
pub const MODEL_SUFFIX: &str = ".model.gz";

/// Serialized form of one layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayerRecord {
    pub op: String,
    pub args: Vec<Value>,
}

struct Encoder<'a> {
    graph: &'a Graph,
    seen: HashMap<NodeId, usize>,
}

impl Encoder<'_> {
    fn node(&mut self, id: NodeId) -> Result<Value, NnKitError> {
        if let Some(&k) = self.seen.get(&id) {
            return Ok(json!({ "ref": k }));
        }
        let k = self.seen.len();
        self.seen.insert(id, k);
        if !self.graph.has_value(id)? {
            return Ok(Value::Null);
        }
        let value = self.graph.value(id)?;
        if !value.is_finite() {
            return Err(NnKitError::NonFiniteValue {
                operation: "save".to_string(),
            });
        }
        Ok(tensor_to_value(value.data(), value.shape()))
    }

    fn nodes(&mut self, ids: &[NodeId]) -> Result<Value, NnKitError> {
        let values = ids.iter().map(|&id| self.node(id)).collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(values))
    }

    fn layer(&mut self, layer: &Layer) -> Result<LayerRecord, NnKitError> {
        let args = match layer {
            Layer::MatMul { w } => vec![self.node(*w)?],
            Layer::Add { b } => vec![self.node(*b)?],
            Layer::ReLU | Layer::Sigmoid | Layer::Tanh | Layer::SoftMax => Vec::new(),
            Layer::LeakyReLU { slope } => vec![json!(slope)],
            Layer::BatchNorm {
                gamma,
                beta,
                running_var,
                running_mean,
                use_running,
            } => vec![
                self.node(*gamma)?,
                self.node(*beta)?,
                self.node(*running_var)?,
                self.node(*running_mean)?,
                json!(use_running),
            ],
            Layer::Dropout { keep_prob } => vec![json!(keep_prob)],
            Layer::L1Loss { target } | Layer::L2Loss { target } | Layer::CELoss { target } => {
                vec![self.node(*target)?]
            }
            Layer::HuberLoss { target, delta } => vec![self.node(*target)?, json!(delta)],
            Layer::L2Reg { params, rate, target } => {
                vec![self.nodes(params)?, json!(rate), self.node(*target)?]
            }
        };
        Ok(LayerRecord {
            op: layer.name().to_string(),
            args,
        })
    }
}

fn tensor_to_value(data: &[f32], shape: &[usize]) -> Value {
    if shape.len() <= 1 {
        return Value::Array(data.iter().map(|&x| json!(x)).collect());
    }
    let chunk = shape[1..].iter().product::<usize>().max(1);
    Value::Array(
        data.chunks(chunk)
            .map(|rows| tensor_to_value(rows, &shape[1..]))
            .collect(),
    )
}

fn value_to_tensor(value: &Value) -> Result<Tensor, NnKitError> {
    let mut shape = Vec::new();
    let mut cursor = value;
    while let Value::Array(items) = cursor {
        shape.push(items.len());
        match items.first() {
            Some(first) => cursor = first,
            None => break,
        }
    }
    let mut data = Vec::with_capacity(shape.iter().product());
    flatten(value, &shape, &mut data)?;
    Tensor::new(data, shape)
}

fn flatten(value: &Value, shape: &[usize], out: &mut Vec<f32>) -> Result<(), NnKitError> {
    match (value, shape.split_first()) {
        (Value::Array(items), Some((&len, rest))) if items.len() == len => {
            items.iter().try_for_each(|item| flatten(item, rest, out))
        }
        (Value::Number(n), None) => {
            let x = n
                .as_f64()
                .ok_or_else(|| NnKitError::Serialization(format!("unrepresentable number {}", n)))?;
            out.push(x as f32);
            Ok(())
        }
        _ => Err(NnKitError::Serialization(format!(
            "ragged or non-numeric tensor literal {}",
            value
        ))),
    }
}

struct Decoder<'a> {
    graph: &'a mut Graph,
    nodes: Vec<NodeId>,
}

impl Decoder<'_> {
    fn node(&mut self, value: &Value) -> Result<NodeId, NnKitError> {
        match value {
            Value::Object(map) => {
                let k = map
                    .get("ref")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| NnKitError::Serialization(format!("bad node reference {}", value)))?;
                self.nodes
                    .get(k as usize)
                    .copied()
                    .ok_or_else(|| NnKitError::Serialization(format!("reference {} precedes its definition", k)))
            }
            Value::Null => Ok(self.push(None)),
            Value::Array(_) => {
                let tensor = value_to_tensor(value)?;
                Ok(self.push(Some(tensor)))
            }
            other => Err(NnKitError::Serialization(format!("expected a tensor, got {}", other))),
        }
    }

    fn push(&mut self, value: Option<Tensor>) -> NodeId {
        let id = self.graph.var(value);
        self.nodes.push(id);
        id
    }

    fn layer(&mut self, record: &LayerRecord) -> Result<Layer, NnKitError> {
        let mut args = Args {
            op: &record.op,
            items: record.args.iter(),
        };
        let layer = match record.op.as_str() {
            "MatMul" => Layer::MatMul { w: self.node(args.next()?)? },
            "Add" => Layer::Add { b: self.node(args.next()?)? },
            "ReLU" => Layer::ReLU,
            "LeakyReLU" => Layer::LeakyReLU { slope: args.f32()? },
            "Sigmoid" => Layer::Sigmoid,
            "Tanh" => Layer::Tanh,
            "SoftMax" => Layer::SoftMax,
            "BatchNorm" => Layer::BatchNorm {
                gamma: self.node(args.next()?)?,
                beta: self.node(args.next()?)?,
                running_var: self.node(args.next()?)?,
                running_mean: self.node(args.next()?)?,
                use_running: args.bool()?,
            },
            "Dropout" => Layer::Dropout { keep_prob: args.f32()? },
            "L1Loss" => Layer::L1Loss { target: self.node(args.next()?)? },
            "L2Loss" => Layer::L2Loss { target: self.node(args.next()?)? },
            "CELoss" => Layer::CELoss { target: self.node(args.next()?)? },
            "HuberLoss" => Layer::HuberLoss {
                target: self.node(args.next()?)?,
                delta: args.f32()?,
            },
            "L2Reg" => {
                let list = args.next()?.as_array().ok_or_else(|| {
                    NnKitError::Serialization("L2Reg expects a list of parameters".to_string())
                })?;
                let params = list.iter().map(|v| self.node(v)).collect::<Result<Vec<_>, _>>()?;
                Layer::L2Reg {
                    params,
                    rate: args.f32()?,
                    target: self.node(args.next()?)?,
                }
            }
            other => return Err(NnKitError::Serialization(format!("unknown operator {:?}", other))),
        };
        args.finish()?;
        Ok(layer)
    }
}

struct Args<'a> {
    op: &'a str,
    items: std::slice::Iter<'a, Value>,
}

impl<'a> Args<'a> {
    fn next(&mut self) -> Result<&'a Value, NnKitError> {
        self.items
            .next()
            .ok_or_else(|| NnKitError::Serialization(format!("{}: missing argument", self.op)))
    }

    fn f32(&mut self) -> Result<f32, NnKitError> {
        let value = self.next()?;
        value
            .as_f64()
            .map(|x| x as f32)
            .ok_or_else(|| NnKitError::Serialization(format!("{}: expected a number, got {}", self.op, value)))
    }

    fn bool(&mut self) -> Result<bool, NnKitError> {
        let value = self.next()?;
        value
            .as_bool()
            .ok_or_else(|| NnKitError::Serialization(format!("{}: expected a boolean, got {}", self.op, value)))
    }

    fn finish(mut self) -> Result<(), NnKitError> {
        match self.items.next() {
            None => Ok(()),
            Some(extra) => Err(NnKitError::Serialization(format!(
                "{}: unexpected extra argument {}",
                self.op, extra
            ))),
        }
    }
}

/// Converts a topology into records, reading parameter values from `graph`.
pub fn to_records(topology: &[Layer], graph: &Graph) -> Result<Vec<LayerRecord>, NnKitError> {
    let mut encoder = Encoder {
        graph,
        seen: HashMap::new(),
    };
    topology.iter().map(|layer| encoder.layer(layer)).collect()
}

/// Rebuilds a topology from records, creating one fresh variable node in
/// `graph` per distinct node argument.
pub fn from_records(records: &[LayerRecord], graph: &mut Graph) -> Result<Vec<Layer>, NnKitError> {
    let mut decoder = Decoder {
        graph,
        nodes: Vec::new(),
    };
    records.iter().map(|record| decoder.layer(record)).collect()
}

pub fn to_json(topology: &[Layer], graph: &Graph) -> Result<String, NnKitError> {
    Ok(serde_json::to_string(&to_records(topology, graph)?)?)
}

pub fn from_json(json: &str, graph: &mut Graph) -> Result<Vec<Layer>, NnKitError> {
    let records: Vec<LayerRecord> = serde_json::from_str(json)?;
    from_records(&records, graph)
}

fn model_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(MODEL_SUFFIX);
    PathBuf::from(name)
}

/// Writes `topology` gzip-compressed to `path` + [`MODEL_SUFFIX`] and
/// returns the full path.
///
/// # Errors
/// `NonFiniteValue` if a parameter holds NaN or infinity; nothing is written.
pub fn save<P: AsRef<Path>>(topology: &[Layer], graph: &Graph, path: P) -> Result<PathBuf, NnKitError> {
    let json = to_json(topology, graph)?;
    let path = model_path(path.as_ref());
    let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
    encoder.write_all(json.as_bytes())?;
    encoder.finish()?;
    debug!("saved {} layers to {}", topology.len(), path.display());
    Ok(path)
}

/// Reads a topology written by [`save`] from `path` + [`MODEL_SUFFIX`].
pub fn load<P: AsRef<Path>>(path: P, graph: &mut Graph) -> Result<Vec<Layer>, NnKitError> {
    let path = model_path(path.as_ref());
    let mut json = String::new();
    GzDecoder::new(File::open(&path)?).read_to_string(&mut json)?;
    let layers = from_json(&json, graph)?;
    debug!("loaded {} layers from {}", layers.len(), path.display());
    Ok(layers)
}

#[cfg(test)]
#[path = "serialization_test.rs"]
mod tests;
