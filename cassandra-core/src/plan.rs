//! Per-member planning.
//!
//! The planner combines every computed value for a member into a `NodePlan`. Plans are built
//! fresh on each pass from an immutable inventory snapshot and are handed to the rendering and
//! service collaborators by value.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::inventory::{Group, Inventory};
use crate::merge::deep_merge;
use crate::repair::build_repair_cron_expression;
use crate::seeds::select_seeds;
use crate::settings::{merge_settings, yaml_mapping, yaml_string, Settings, KEY_SERVER, KEY_SERVICE};
use crate::sizing::ResourceSizing;
use crate::token::derive_initial_token;
use crate::topology::{render_topology_properties, ProviderRegistry};
use crate::version::{version_defaults, CassandraVersion};

/// The complete plan of one cluster member.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct NodePlan {
    /// The ID of the planned member.
    pub member_id: String,
    /// The merged settings of the member.
    pub settings: Settings,
    /// The crontab line of the member's repair job.
    pub repair_cron: String,
    /// The property-file snitch topology of the member's group.
    pub topology_properties: String,
}

/// A planner for the members of a cluster.
#[derive(Clone, Debug)]
pub struct Planner {
    config: PlanConfig,
    version: CassandraVersion,
    registry: ProviderRegistry,
}

impl Planner {
    /// Create a new instance, validating the given config.
    pub fn new(config: PlanConfig, registry: ProviderRegistry) -> Result<Self> {
        config.validate().context("invalid plan config")?;
        let version = config.parsed_version()?;
        Ok(Self { config, version, registry })
    }

    /// The config of this planner.
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Plan every member of the target group, in inventory order.
    pub fn plan_group(&self, inventory: &Inventory, group: &str) -> Result<Vec<NodePlan>> {
        let group = inventory.group(group)?;
        group.validate()?;
        group.members.iter().map(|member| self.plan_group_member(group, member.id())).collect()
    }

    /// Plan the target member of the target group.
    pub fn plan_member(&self, inventory: &Inventory, group: &str, member_id: &str) -> Result<NodePlan> {
        let group = inventory.group(group)?;
        group.validate()?;
        self.plan_group_member(group, member_id)
    }

    #[tracing::instrument(level = "debug", skip(self, group), fields(group = %group.name))]
    fn plan_group_member(&self, group: &Group, member_id: &str) -> Result<NodePlan> {
        let index = match group.index_of(member_id) {
            Some(index) => index,
            None => bail!(PlanError::UnknownMember(member_id.into())),
        };
        let member = &group.members[index];

        let topology = self.registry.resolve_topology(member);
        let sizing = ResourceSizing::for_member(member, self.config.ram_fraction)
            .with_context(|| format!("error sizing JVM for member `{}`", member_id))?;
        let initial_token = derive_initial_token(self.config.tokens.as_ref(), member, &group.members, self.config.token_index)?;
        let seeds = select_seeds(self.config.max_seeds, self.config.seeds.as_deref(), &group.members)?;
        let repair_cron = build_repair_cron_expression(index, group.len(), self.config.repair_day, self.config.repair_keyspace.as_deref())?;
        let topology_properties = render_topology_properties(&group.members);

        let computed = yaml_mapping(vec![
            (
                KEY_SERVER,
                yaml_mapping(vec![
                    ("listen_address", yaml_string(&topology.listen_address)),
                    ("rpc_address", yaml_string(&topology.rpc_address)),
                    ("endpoint_snitch", yaml_string(&topology.endpoint_snitch)),
                    ("initial_token", yaml_string(&initial_token)),
                ]),
            ),
            (
                KEY_SERVICE,
                yaml_mapping(vec![
                    ("max_heap_size", yaml_string(&sizing.max_heap)),
                    ("heap_newsize", yaml_string(&sizing.heap_new)),
                    ("young_gen_size", yaml_string(&sizing.young_gen_size)),
                    ("stack_size", yaml_string(&sizing.stack_size)),
                ]),
            ),
        ]);
        let settings = merge_settings(&self.user_overrides(), &version_defaults(&self.version), &computed, &seeds)?;

        tracing::info!(
            member = member_id,
            index,
            initial_token = %initial_token,
            seeds = %seeds,
            "planned cluster member"
        );
        Ok(NodePlan {
            member_id: member_id.into(),
            settings,
            repair_cron,
            topology_properties,
        })
    }

    /// The user override layer: the declared cluster name beneath the explicit overrides.
    fn user_overrides(&self) -> Value {
        let mut overrides = Value::Mapping(Mapping::new());
        if let Some(cluster_name) = &self.config.cluster_name {
            overrides = yaml_mapping(vec![(KEY_SERVER, yaml_mapping(vec![("cluster_name", yaml_string(cluster_name))]))]);
        }
        if !self.config.overrides.is_null() {
            deep_merge(&mut overrides, self.config.overrides.clone());
        }
        overrides
    }
}
