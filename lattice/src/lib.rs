// Site and model definitions for 1-D quantum lattice chains.

pub mod model;
pub mod site;

pub use model::{Coupling, HeisenbergModel, HubbardModel, Model, OnSiteTerm, TfimModel};
pub use site::{OperatorRole, Site};
