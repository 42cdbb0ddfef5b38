pub mod phototree_core;
