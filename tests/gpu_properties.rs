// tests/gpu_properties.rs

use std::collections::BTreeSet;

use proptest::prelude::*;
use renderwatch::gpu::{GpuRequest, parse_mask, render_mask, resolve};

/// Any subset of `0..max`, one coin flip per device.
fn device_set(max: u32) -> impl Strategy<Value = BTreeSet<u32>> {
    proptest::collection::vec(any::<bool>(), max as usize).prop_map(|flags| {
        flags
            .into_iter()
            .enumerate()
            .filter(|(_, on)| *on)
            .map(|(i, _)| i as u32)
            .collect()
    })
}

proptest! {
    #[test]
    fn mask_round_trips_for_any_subset_of_sixteen(devices in device_set(16)) {
        let list: Vec<u32> = devices.iter().copied().collect();
        let mask = render_mask(&list, 16);
        prop_assert_eq!(mask.len(), 16);
        prop_assert_eq!(parse_mask(&mask).unwrap(), devices);
    }

    #[test]
    fn count_with_affinity_never_leaves_affinity(
        affinity in device_set(16),
        per_task in 1u32..20,
    ) {
        let request = GpuRequest {
            gpus_per_task: per_task,
            worker_affinity: Some(affinity.clone()),
            ..GpuRequest::default()
        };
        let resolution = resolve(&request);

        prop_assert!(resolution.fatal.is_none());
        prop_assert!(resolution.devices.iter().all(|d| affinity.contains(d)));
        prop_assert_eq!(
            !resolution.warnings.is_empty(),
            per_task as usize > affinity.len()
        );
    }

    #[test]
    fn explicit_with_affinity_is_fatal_exactly_when_disjoint(
        affinity in device_set(16),
        explicit in device_set(16).prop_filter("non-empty", |s| !s.is_empty()),
    ) {
        let request = GpuRequest {
            select_devices: explicit.clone(),
            worker_affinity: Some(affinity.clone()),
            ..GpuRequest::default()
        };
        let resolution = resolve(&request);

        let expected: Vec<u32> = explicit.intersection(&affinity).copied().collect();
        prop_assert_eq!(&resolution.devices, &expected);
        prop_assert_eq!(resolution.fatal.is_some(), expected.is_empty());
    }

    #[test]
    fn thread_blocks_are_disjoint(per_task in 1u32..8, a in 0u32..8, b in 0u32..8) {
        prop_assume!(a != b);
        let block = |thread_index| {
            resolve(&GpuRequest {
                gpus_per_task: per_task,
                thread_index,
                ..GpuRequest::default()
            })
            .devices
        };
        let first: BTreeSet<u32> = block(a).into_iter().collect();
        let second: BTreeSet<u32> = block(b).into_iter().collect();
        prop_assert_eq!(first.len(), per_task as usize);
        prop_assert!(first.is_disjoint(&second));
    }
}
