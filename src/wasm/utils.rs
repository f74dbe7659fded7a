use wasm_bindgen::prelude::*;
use js_sys::{Array};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_GRAPH: &'static str = r#"
export const NODE_ID_OUT = -1;
export const NODE_ID_NULL = -2;
export const MAX_NEIGHBOURS = 4;
"#;

pub fn parse_js_point<const D: usize>(val: &JsValue) -> Option<[f64; D]> {
    let arr = val.dyn_ref::<Array>()?;
    if arr.length() < D as u32 {
        return None;
    }
    let mut point = [0.0; D];
    for i in 0..D {
        point[i] = arr.get(i as u32).as_f64()?;
    }
    Some(point)
}

/// Flat `[x, y, z, ...]` center buffer into spheres that all take `radius`.
pub fn parse_spheres(data: &[f64], radius: f64) -> Result<Vec<crate::sphere::Sphere>, JsValue> {
    if data.len() % 3 != 0 {
        return Err(JsValue::from_str(&format!(
            "center buffer length {} is not a multiple of 3",
            data.len()
        )));
    }
    Ok(data
        .chunks_exact(3)
        .map(|c| crate::sphere::Sphere::new([c[0], c[1], c[2]], radius))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spheres_shares_radius() {
        let spheres = parse_spheres(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 1.5).unwrap();
        assert_eq!(spheres.len(), 2);
        assert_eq!(spheres[0].center, [0.0, 1.0, 2.0]);
        assert_eq!(spheres[1].center, [3.0, 4.0, 5.0]);
        assert!(spheres.iter().all(|s| s.radius == 1.5));
    }

    #[test]
    fn test_parse_spheres_negative_radius_keeps_layout() {
        // A negative radius does not switch the buffer layout.
        let spheres = parse_spheres(&[0.0, 0.0, 0.0, 2.0, 2.0, 2.0], -1.0).unwrap();
        assert_eq!(spheres.len(), 2);
        assert!(spheres.iter().all(|s| s.radius == -1.0));
    }
}
