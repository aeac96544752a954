use infrastructure_composition::di::{ArtifactLoader, ComponentType};
use infrastructure_composition::{component, lifecycle, InventoryArtifactLoader};

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[component(contract = dyn Clock, name = "fixed", default)]
#[lifecycle(transient)]
#[derive(Default)]
struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        42
    }
}

fn main() {
    let artifacts = InventoryArtifactLoader::new().load().unwrap();
    let entry = artifacts
        .iter()
        .flat_map(|artifact| artifact.types().iter())
        .find(|entry| entry.type_name.ends_with("::FixedClock"))
        .unwrap();

    let tag = entry.register.unwrap();
    assert_eq!(tag.name, "fixed");
    let activation: ComponentType = (entry.activation)();
    assert!(activation.service_type().is::<dyn Clock>());
    assert!(entry.lifecycle.is_some());
}
