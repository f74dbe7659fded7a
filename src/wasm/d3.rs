use crate::edge::{CostFunction, EdgeSampling, InverseClearanceCost, LengthCost};
use crate::graph::{VoronoiGraph, MAX_NEIGHBOURS};
use crate::triangulation::{triangulate, TriangulationConfig};
use crate::wasm::utils::{parse_js_point, parse_spheres};
use wasm_bindgen::prelude::*;
use js_sys::{Array, Function, Reflect};

// --- Config ---

/// Settings of the graph construction.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct TunnelConfig3D {
    pub probe_radius: f64,
    pub step: f64,
    pub min_samples: usize,
    pub max_samples: usize,
}

#[wasm_bindgen]
impl TunnelConfig3D {
    #[wasm_bindgen(constructor)]
    pub fn new(probe_radius: f64) -> TunnelConfig3D {
        let sampling = EdgeSampling::default();
        TunnelConfig3D {
            probe_radius,
            step: sampling.step,
            min_samples: sampling.min_samples,
            max_samples: sampling.max_samples,
        }
    }
}

impl From<TunnelConfig3D> for TriangulationConfig {
    fn from(c: TunnelConfig3D) -> Self {
        TriangulationConfig::default()
            .with_probe_radius(c.probe_radius)
            .with_sampling(EdgeSampling {
                step: c.step,
                min_samples: c.min_samples,
                max_samples: c.max_samples,
            })
    }
}

// --- Cost ---

/// A JavaScript `(clearance, length) => cost` function, or an object with a `cost` method.
struct JsCostFunction {
    val: JsValue,
}

unsafe impl Send for JsCostFunction {}
unsafe impl Sync for JsCostFunction {}

impl std::fmt::Debug for JsCostFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsCostFunction")
    }
}

impl CostFunction for JsCostFunction {
    fn cost(&self, clearance: f64, length: f64) -> f64 {
        let func = match self.val.dyn_ref::<Function>() {
            Some(f) => Some(f.clone()),
            None => Reflect::get(&self.val, &"cost".into())
                .and_then(|f| f.dyn_into::<Function>())
                .ok(),
        };
        if let Some(func) = func {
            if let Ok(res) = func.call2(&self.val, &clearance.into(), &length.into()) {
                return res.as_f64().unwrap_or(f64::INFINITY);
            }
        }
        f64::INFINITY
    }
}

// --- Graph ---

#[wasm_bindgen(js_name = TunnelGraph)]
pub struct TunnelGraphWASM {
    inner: VoronoiGraph,
}

#[wasm_bindgen(js_class = TunnelGraph)]
impl TunnelGraphWASM {
    /// Triangulates spheres given as flat `[x, y, z, ...]` centers sharing `radius`.
    ///
    /// Edges are weighted by inverse clearance with the given exponent, or by
    /// length alone when the exponent is zero.
    #[wasm_bindgen(constructor)]
    pub fn new(centers: &[f64], radius: f64, config: TunnelConfig3D, exponent: f64) -> Result<TunnelGraphWASM, JsValue> {
        let spheres = parse_spheres(centers, radius)?;
        let config: TriangulationConfig = config.into();
        let inner = if exponent == 0.0 {
            triangulate(&spheres, &config, &LengthCost)
        } else {
            triangulate(&spheres, &config, &InverseClearanceCost::new(exponent))
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(TunnelGraphWASM { inner })
    }

    #[wasm_bindgen(js_name = withCost)]
    pub fn with_cost(centers: &[f64], radius: f64, config: TunnelConfig3D, cost: JsValue) -> Result<TunnelGraphWASM, JsValue> {
        let spheres = parse_spheres(centers, radius)?;
        let inner = triangulate(&spheres, &config.into(), &JsCostFunction { val: cost })
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(TunnelGraphWASM { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn count_nodes(&self) -> usize {
        self.inner.size()
    }

    #[wasm_bindgen(getter)]
    pub fn count_edges(&self) -> usize {
        self.inner.edge_count()
    }

    /// Node spheres as flat `[x, y, z, r, ...]`.
    #[wasm_bindgen(getter)]
    pub fn spheres(&self) -> Vec<f64> {
        self.inner
            .spheres()
            .iter()
            .flat_map(|s| [s.center[0], s.center[1], s.center[2], s.radius])
            .collect()
    }

    /// Neighbour ids, four slots per node.
    #[wasm_bindgen(getter)]
    pub fn neighbours(&self) -> Vec<i32> {
        (0..self.inner.size())
            .flat_map(|n| (0..MAX_NEIGHBOURS).map(move |slot| (n, slot)))
            .map(|(n, slot)| self.inner.neighbour(n, slot))
            .collect()
    }

    /// Edge weights, four slots per node; empty slots are infinite.
    #[wasm_bindgen(getter)]
    pub fn weights(&self) -> Vec<f64> {
        (0..self.inner.size())
            .flat_map(|n| (0..MAX_NEIGHBOURS).map(move |slot| (n, slot)))
            .map(|(n, slot)| self.inner.weight(n, slot))
            .collect()
    }

    /// Bottleneck sphere `[x, y, z, r]` of the edge between two nodes.
    pub fn bottleneck(&self, x: usize, y: usize) -> Option<Vec<f64>> {
        self.inner
            .bottleneck_by_nodes(x, y)
            .map(|s| vec![s.center[0], s.center[1], s.center[2], s.radius])
    }

    /// Edges as an array of `{ from, to, weight, bottleneck }` objects, each pair once.
    #[wasm_bindgen(getter)]
    pub fn edges(&self) -> Array {
        let edges = Array::new();
        for x in 0..self.inner.size() {
            for y in self.inner.neighbours(x) {
                if y < x {
                    continue;
                }
                let Some(edge) = self.inner.edge_by_nodes(x, y) else {
                    continue;
                };
                let obj = js_sys::Object::new();
                let b = edge.bottleneck;
                let bottleneck = Array::of4(&b.center[0].into(), &b.center[1].into(), &b.center[2].into(), &b.radius.into());
                let _ = Reflect::set(&obj, &"from".into(), &(x as u32).into());
                let _ = Reflect::set(&obj, &"to".into(), &(y as u32).into());
                let _ = Reflect::set(&obj, &"weight".into(), &edge.weight.into());
                let _ = Reflect::set(&obj, &"bottleneck".into(), &bottleneck);
                edges.push(&obj);
            }
        }
        edges
    }

    pub fn is_disabled(&self, node: usize) -> bool {
        self.inner.is_disabled(node)
    }

    pub fn is_outer(&self, node: usize) -> bool {
        self.inner.is_outer(node)
    }

    pub fn build_index(&mut self) {
        self.inner.build_index();
    }

    pub fn nearest_node(&self, x: f64, y: f64, z: f64) -> Option<usize> {
        self.inner.nearest_node([x, y, z])
    }

    /// Same as `nearest_node` but takes an `[x, y, z]` array.
    #[wasm_bindgen(js_name = nearestNodeTo)]
    pub fn nearest_node_to(&self, point: JsValue) -> Option<usize> {
        parse_js_point::<3>(&point).and_then(|p| self.inner.nearest_node(p))
    }

    pub fn nodes_within(&self, x: f64, y: f64, z: f64, radius: f64) -> Vec<u32> {
        self.inner
            .nodes_within([x, y, z], radius)
            .into_iter()
            .map(|i| i as u32)
            .collect()
    }

    pub fn check(&self) -> Result<(), JsValue> {
        self.inner.check().map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
