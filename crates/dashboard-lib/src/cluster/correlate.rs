//! Task/instance correlation
//!
//! Folds the fetched task records into per-zone aggregates. An explicit
//! accumulator carries the zone list plus the keyed lookup structures, so
//! the whole pass is linear in the number of tasks while the output stays an
//! ordered sequence for deterministic rendering.

use crate::error::ClusterError;
use crate::models::{ContainerInstance, ServiceAggregate, Task, ZoneAggregate};
use std::collections::{HashMap, HashSet};

/// Accumulator state for one correlation pass
#[derive(Default)]
struct Correlation {
    /// Zones in first-seen order; this becomes the result
    zones: Vec<ZoneAggregate>,
    /// Zone name -> position in `zones`
    zone_index: HashMap<String, usize>,
    /// Zone name -> instance ARNs already counted for that zone
    counted_instances: HashMap<String, HashSet<String>>,
    /// Zone name -> service name -> position in that zone's service list
    service_index: HashMap<String, HashMap<String, usize>>,
}

impl Correlation {
    /// Fold one task (already resolved to its instance) into the aggregates
    fn observe(&mut self, instance: &ContainerInstance, task: &Task) {
        let zone = instance.zone.as_str();

        let zone_pos = match self.zone_index.get(zone) {
            Some(&pos) => pos,
            None => {
                self.zones.push(ZoneAggregate::new(zone));
                let pos = self.zones.len() - 1;
                self.zone_index.insert(zone.to_string(), pos);
                pos
            }
        };

        // Count each instance once per zone, however many tasks it carries
        let counted = self.counted_instances.entry(zone.to_string()).or_default();
        if counted.insert(instance.arn.clone()) {
            self.zones[zone_pos].instance_count += 1;
        }

        let services = self.service_index.entry(zone.to_string()).or_default();
        match services.get(&task.service_name) {
            Some(&service_pos) => {
                let service = &mut self.zones[zone_pos].services[service_pos];
                service.count += 1;
                // Last task record seen wins the status
                service.status = task.status.clone();
            }
            None => {
                self.zones[zone_pos].services.push(ServiceAggregate {
                    name: task.service_name.clone(),
                    status: task.status.clone(),
                    count: 1,
                });
                services.insert(task.service_name.clone(), self.zones[zone_pos].services.len() - 1);
            }
        }
    }

    fn into_zones(self) -> Vec<ZoneAggregate> {
        self.zones
    }
}

/// Correlate fetched tasks with fetched instances into per-zone aggregates
///
/// Tasks are processed in fetch order. A task referencing an instance ARN
/// absent from the described set is an API inconsistency and fails the whole
/// pass; nothing partial survives.
pub(crate) fn correlate(
    instances: &[ContainerInstance],
    tasks: &[Task],
) -> Result<Vec<ZoneAggregate>, ClusterError> {
    let by_arn: HashMap<&str, &ContainerInstance> = instances
        .iter()
        .map(|instance| (instance.arn.as_str(), instance))
        .collect();

    let mut correlation = Correlation::default();
    for task in tasks {
        let instance = by_arn
            .get(task.container_instance_arn.as_str())
            .ok_or_else(|| {
                ClusterError::correlation(
                    &task.container_instance_arn,
                    format!(
                        "task for service {} references an instance missing from the described set",
                        task.service_name
                    ),
                )
            })?;
        correlation.observe(instance, task);
    }

    Ok(correlation.into_zones())
}
