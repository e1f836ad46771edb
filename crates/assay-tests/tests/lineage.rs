//! Lineage tests: the provenance graph seen through material operations.

use std::collections::BTreeSet;

use assay_core::record::Datum;
use assay_core::{NodeKind, ObjId};
use assay_heritage::{ProvenanceNode, Snapshot};
use assay_material::{Lineage, Material};
use assay_tests::helpers::*;
use proptest::prelude::*;

#[test]
fn blend_traces_back_to_every_contributing_batch() {
    let ctx = static_context();
    let mut batches = seed(&ctx, 3, 10.0, &fresh_fuel());
    let unrelated = Material::create(&ctx, 10.0, spent_fuel()).unwrap();

    let mut blend = batches[0].extract_qty(1.0).unwrap();
    let mut part = batches[1].extract_qty(2.0).unwrap();
    blend.absorb(&mut part).unwrap();

    let origins = ctx.with_tracker(|t| t.origins_of(blend.obj_id().unwrap())).unwrap();
    let expected: BTreeSet<ObjId> = [batches[0].obj_id().unwrap(), batches[1].obj_id().unwrap()]
        .into_iter()
        .collect();
    assert_eq!(origins, expected);
    assert!(!origins.contains(&batches[2].obj_id().unwrap()));
    assert!(!origins.contains(&unrelated.obj_id().unwrap()));
}

#[test]
fn history_lists_every_version() {
    let ctx = fast_decay_context();
    let mut m = Material::create(&ctx, 10.0, spent_fuel()).unwrap();
    let obj = m.obj_id().unwrap();
    m.extract_qty(1.0).unwrap();
    m.transmute(fresh_fuel()).unwrap();
    m.decay(2).unwrap();

    let kinds: Vec<NodeKind> = ctx.with_tracker(|t| {
        t.history(obj)
            .into_iter()
            .map(|id| t.node(id).unwrap().kind)
            .collect()
    });
    assert_eq!(
        kinds,
        vec![
            NodeKind::Created,
            NodeKind::Split,
            NodeKind::Modified,
            NodeKind::Modified,
        ]
    );
}

#[test]
fn split_nodes_carry_both_halves() {
    let ctx = static_context();
    ctx.set_time(4);
    let mut m = Material::create(&ctx, 10.0, fresh_fuel()).unwrap();
    let created = ctx.with_tracker(|t| t.head(m.obj_id().unwrap())).unwrap();
    let part = m.extract_qty(2.5).unwrap();

    let (left, right): (ProvenanceNode, ProvenanceNode) = ctx.with_tracker(|t| {
        (
            t.node(t.head(m.obj_id().unwrap()).unwrap()).unwrap().clone(),
            t.node(t.head(part.obj_id().unwrap()).unwrap()).unwrap().clone(),
        )
    });
    assert_eq!(left.kind, NodeKind::Split);
    assert_eq!(right.kind, NodeKind::Extracted);
    assert_eq!(left.parents, vec![created]);
    assert_eq!(right.parents, vec![created]);
    assert_eq!(
        left.snapshot,
        Snapshot {
            quantity: 7.5,
            comp: m.state_id(),
            time: 4,
        }
    );
    assert_eq!(
        right.snapshot,
        Snapshot {
            quantity: 2.5,
            comp: part.state_id(),
            time: 4,
        }
    );
}

#[test]
fn samples_never_reach_the_graph() {
    let (ctx, recorder) = recording_context();
    let m = Material::create(&ctx, 5.0, fresh_fuel()).unwrap();
    let nodes = ctx.with_tracker(|t| t.node_count());
    let resources = recorder.resource_count();

    let mut sample = m.sample();
    let mut piece = sample.extract_qty(2.0).unwrap();
    sample.absorb(&mut piece).unwrap();
    sample.transmute(spent_fuel()).unwrap();

    assert_eq!(ctx.with_tracker(|t| t.node_count()), nodes);
    assert_eq!(recorder.resource_count(), resources);
}

#[test]
fn absorbed_material_is_retired_for_good() {
    let ctx = static_context();
    let mut a = Material::create(&ctx, 5.0, fresh_fuel()).unwrap();
    let mut d = Material::create(&ctx, 3.0, spent_fuel()).unwrap();
    let d_obj = d.obj_id().unwrap();
    a.absorb(&mut d).unwrap();

    assert_eq!(d.lineage(), Lineage::Retired(d_obj));
    let nodes = ctx.with_tracker(|t| t.node_count());

    // Pouring a retired (empty) material anywhere adds no second parent.
    let mut e = Material::create(&ctx, 1.0, fresh_fuel()).unwrap();
    e.absorb(&mut d).unwrap();
    ctx.with_tracker(|t| {
        assert_eq!(t.node_count(), nodes + 2);
        let head = t.head(e.obj_id().unwrap()).unwrap();
        assert_eq!(t.parents(head).len(), 1);
        assert!(t.is_retired(d_obj));
    });
}

#[test]
fn recorded_rows_mirror_the_graph() {
    let (ctx, recorder) = recording_context();
    let mut a = Material::create(&ctx, 5.0, fresh_fuel()).unwrap();
    let mut b = a.extract_qty(1.0).unwrap();
    a.absorb(&mut b).unwrap();

    let rows: Vec<(u64, Vec<u64>)> = recorder
        .datums()
        .into_iter()
        .filter_map(|d| match d {
            Datum::Resource { node, parents, .. } => {
                Some((node.0, parents.into_iter().map(|p| p.0).collect()))
            }
            Datum::Composition { .. } => None,
        })
        .collect();
    assert_eq!(rows.len(), ctx.with_tracker(|t| t.node_count()));
    assert_eq!(rows.last(), Some(&(4, vec![2, 3])));

    let json = serde_json::to_string(&recorder.datums()[0]).unwrap();
    assert!(json.contains("\"table\":\"resource\""));
}

// ---------------------------------------------------------------------------
// Graph invariants under random operations
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_tracked_material_has_one_live_head(
        ops in prop::collection::vec((any::<bool>(), any::<usize>(), any::<usize>()), 1..60),
    ) {
        let ctx = static_context();
        let mut pool = seed(&ctx, 2, 100.0, &fresh_fuel());
        let mut retired = Vec::new();

        for (split, a, b) in ops {
            let i = a % pool.len();
            if split || pool.len() < 2 {
                let q = pool[i].quantity() / 2.0;
                let part = pool[i].extract_qty(q).unwrap();
                pool.push(part);
            } else {
                let j = b % pool.len();
                if i == j {
                    continue;
                }
                let mut other = pool.swap_remove(j);
                let i = if i == pool.len() { j } else { i };
                pool[i].absorb(&mut other).unwrap();
                retired.push(other);
            }
        }

        ctx.with_tracker(|t| {
            prop_assert_eq!(t.live_count(), pool.len());
            prop_assert_eq!(t.retired_count(), retired.len());
            for m in &pool {
                prop_assert!(t.is_live(m.obj_id().unwrap()));
            }
            for m in &retired {
                prop_assert!(t.is_retired(m.obj_id().unwrap()));
                prop_assert_eq!(m.quantity(), 0.0);
            }
            Ok(())
        })?;
        prop_assert_eq!(ctx.registry().len(), pool.len());
    }
}
