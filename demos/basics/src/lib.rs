//! Forces and Motion: Basics, all four screens behind one set of exports.
//! Screens are switched from the navigation bar via the SELECT_SCREEN event.

use forces_motion::Sim;
use wasm_bindgen::prelude::*;

forces_motion_web::export_screen!(Sim, "forces-and-motion-basics");
