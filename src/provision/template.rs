//! Parameterized network stack.
//!
//! Declares the VPC, gateway, route tables and one subnet per assignment
//! entry, then the optional compute, database and DNS resources.

use super::{ProvisioningClient, Resource, ResourceId, Tags};
use crate::config::{ComputeConfig, Config, DatabaseConfig, DnsConfig};
use crate::error::ProvisionError;
use crate::models::{NetworkBlock, Role, ZoneAssignment, ZoneId};
use itertools::Itertools;
use serde::Serialize;

/// Identifiers exported by a stack run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackOutputs {
    pub vpc_id: ResourceId,
    pub internet_gateway_id: ResourceId,
    pub subnet_ids: Vec<ResourceId>,
    /// Public table first, then private.
    pub route_table_ids: Vec<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    /// All zones of the region, not only the ones holding a subnet.
    pub availability_zones: Vec<ZoneId>,
}

/// Stack settings taken from [`Config`].
#[derive(Debug, Clone)]
pub struct StackTemplate {
    name: String,
    tags: Tags,
    compute: Option<ComputeConfig>,
    database: Option<DatabaseConfig>,
    dns: Option<DnsConfig>,
}

/// Subnet ids split by role.
struct SubnetIds {
    all: Vec<ResourceId>,
    public: Vec<ResourceId>,
    private: Vec<ResourceId>,
}

impl StackTemplate {
    pub fn new(config: &Config) -> Result<StackTemplate, ProvisionError> {
        if config.dns.is_some() && config.compute.is_none() {
            return Err(ProvisionError::Configuration(
                "dns record needs a load balancer, add a compute section".to_string(),
            ));
        }
        if let Some(compute) = &config.compute {
            if compute.min_size > compute.max_size {
                return Err(ProvisionError::Configuration(format!(
                    "compute minSize {} > maxSize {}",
                    compute.min_size, compute.max_size
                )));
            }
        }
        Ok(StackTemplate {
            name: config.name.clone(),
            tags: config.tags.clone(),
            compute: config.compute.clone(),
            database: config.database.clone(),
            dns: config.dns.clone(),
        })
    }

    fn tags(&self, name: &str) -> Tags {
        let mut tags = self.tags.clone();
        tags.insert("Name".to_string(), name.to_string());
        tags
    }

    fn resource_name(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.name)
    }

    /// Check the assignment has the subnets the optional sections need.
    fn check_assignment(&self, assignment: &ZoneAssignment) -> Result<(), ProvisionError> {
        let has = |role| assignment.with_role(role).next().is_some();
        if self.compute.is_some() && !(has(Role::Public) && has(Role::Private)) {
            return Err(ProvisionError::Configuration(
                "compute needs at least one public and one private subnet".to_string(),
            ));
        }
        if self.database.is_some() && !has(Role::Private) {
            return Err(ProvisionError::Configuration(
                "database needs at least one private subnet".to_string(),
            ));
        }
        Ok(())
    }

    /// Declare the whole stack through `client`.
    ///
    /// Nothing is declared when the assignment cannot carry the
    /// configured sections.
    pub fn apply<C: ProvisioningClient>(
        &self,
        client: &mut C,
        vpc_block: NetworkBlock,
        assignment: &ZoneAssignment,
    ) -> Result<StackOutputs, ProvisionError> {
        self.check_assignment(assignment)?;
        log::info!(
            "Declaring stack '{}' vpc={vpc_block} subnets={}",
            self.name,
            assignment.len()
        );

        let vpc_name = self.resource_name("Vpc");
        let vpc_id = client.declare(&Resource::Vpc {
            cidr_block: vpc_block,
            enable_dns_support: true,
            enable_dns_hostnames: true,
            tags: self.tags(&vpc_name),
            name: vpc_name,
        })?;

        let igw_name = self.resource_name("Igw");
        let igw_id = client.declare(&Resource::InternetGateway {
            vpc_id: vpc_id.clone(),
            tags: self.tags(&igw_name),
            name: igw_name,
        })?;

        let public_rtb_id = client.declare(&Resource::RouteTable {
            name: "publicRouteTable".to_string(),
            vpc_id: vpc_id.clone(),
            tags: self.tags("publicRouteTable"),
        })?;
        client.declare(&Resource::Route {
            name: "publicRoute".to_string(),
            route_table_id: public_rtb_id.clone(),
            destination_cidr_block: NetworkBlock::new("0.0.0.0/0")?,
            gateway_id: igw_id.clone(),
        })?;
        let private_rtb_id = client.declare(&Resource::RouteTable {
            name: "privateRouteTable".to_string(),
            vpc_id: vpc_id.clone(),
            tags: self.tags("privateRouteTable"),
        })?;

        let subnets = self.declare_subnets(client, &vpc_id, assignment, &public_rtb_id, &private_rtb_id)?;

        let mut outputs = StackOutputs {
            vpc_id: vpc_id.clone(),
            internet_gateway_id: igw_id,
            subnet_ids: subnets.all.clone(),
            route_table_ids: vec![public_rtb_id, private_rtb_id],
            load_balancer_id: None,
            database_id: None,
            dns_name: None,
            availability_zones: assignment.zones.clone(),
        };

        if let Some(compute) = &self.compute {
            outputs.load_balancer_id = Some(self.declare_compute(client, &vpc_id, compute, &subnets)?);
        }
        if let Some(database) = &self.database {
            outputs.database_id = Some(self.declare_database(client, &vpc_id, database, &subnets)?);
        }
        if let (Some(dns), Some(lb_id)) = (&self.dns, &outputs.load_balancer_id) {
            let fqdn = format!("{}.{}", dns.record_name, dns.zone_name);
            client.declare(&Resource::DnsRecord {
                name: self.resource_name("DnsRecord"),
                fqdn: fqdn.clone(),
                ttl: dns.ttl,
                target_id: lb_id.clone(),
            })?;
            outputs.dns_name = Some(fqdn);
        }

        log::info!(
            "Stack '{}' declared: subnets=[{}]",
            self.name,
            outputs.subnet_ids.iter().join(", ")
        );
        Ok(outputs)
    }

    fn declare_subnets<C: ProvisioningClient>(
        &self,
        client: &mut C,
        vpc_id: &ResourceId,
        assignment: &ZoneAssignment,
        public_rtb_id: &ResourceId,
        private_rtb_id: &ResourceId,
    ) -> Result<SubnetIds, ProvisionError> {
        let mut ids = SubnetIds {
            all: Vec::with_capacity(assignment.len()),
            public: Vec::new(),
            private: Vec::new(),
        };
        for entry in assignment.iter() {
            let name = entry.subnet_name();
            let subnet_id = client.declare(&Resource::Subnet {
                vpc_id: vpc_id.clone(),
                cidr_block: entry.block,
                availability_zone: entry.zone.clone(),
                map_public_ip_on_launch: entry.role.is_public(),
                tags: self.tags(&name),
                name,
            })?;
            let route_table_id = match entry.role {
                Role::Public => public_rtb_id.clone(),
                Role::Private => private_rtb_id.clone(),
            };
            client.declare(&Resource::RouteTableAssociation {
                name: format!("{}RouteTableAssociation{}", entry.role, entry.index),
                subnet_id: subnet_id.clone(),
                route_table_id,
            })?;
            match entry.role {
                Role::Public => ids.public.push(subnet_id.clone()),
                Role::Private => ids.private.push(subnet_id.clone()),
            }
            ids.all.push(subnet_id);
        }
        Ok(ids)
    }

    fn declare_compute<C: ProvisioningClient>(
        &self,
        client: &mut C,
        vpc_id: &ResourceId,
        compute: &ComputeConfig,
        subnets: &SubnetIds,
    ) -> Result<ResourceId, ProvisionError> {
        let sg_name = self.resource_name("WebSecurityGroup");
        let sg_id = client.declare(&Resource::SecurityGroup {
            vpc_id: vpc_id.clone(),
            ingress_ports: vec![compute.port],
            tags: self.tags(&sg_name),
            name: sg_name,
        })?;

        let lb_name = self.resource_name("LoadBalancer");
        let lb_id = client.declare(&Resource::LoadBalancer {
            subnet_ids: subnets.public.clone(),
            security_group_ids: vec![sg_id],
            port: compute.port,
            tags: self.tags(&lb_name),
            name: lb_name,
        })?;

        let asg_name = self.resource_name("AutoScalingGroup");
        client.declare(&Resource::AutoScalingGroup {
            instance_type: compute.instance_type.clone(),
            min_size: compute.min_size,
            max_size: compute.max_size,
            desired_capacity: compute
                .desired_capacity
                .unwrap_or(compute.min_size)
                .clamp(compute.min_size, compute.max_size),
            subnet_ids: subnets.private.clone(),
            load_balancer_id: lb_id.clone(),
            tags: self.tags(&asg_name),
            name: asg_name,
        })?;
        Ok(lb_id)
    }

    fn declare_database<C: ProvisioningClient>(
        &self,
        client: &mut C,
        vpc_id: &ResourceId,
        database: &DatabaseConfig,
        subnets: &SubnetIds,
    ) -> Result<ResourceId, ProvisionError> {
        let sg_name = self.resource_name("DbSecurityGroup");
        let sg_id = client.declare(&Resource::SecurityGroup {
            vpc_id: vpc_id.clone(),
            ingress_ports: vec![default_db_port(&database.engine)],
            tags: self.tags(&sg_name),
            name: sg_name,
        })?;

        let group_name = self.resource_name("DbSubnetGroup");
        let group_id = client.declare(&Resource::DbSubnetGroup {
            subnet_ids: subnets.private.clone(),
            tags: self.tags(&group_name),
            name: group_name,
        })?;

        let db_name = self.resource_name("Database");
        let db_id = client.declare(&Resource::DbInstance {
            engine: database.engine.clone(),
            engine_version: database.engine_version.clone(),
            instance_class: database.instance_class.clone(),
            allocated_storage_gib: database.allocated_storage_gib,
            db_subnet_group_id: group_id,
            security_group_ids: vec![sg_id],
            tags: self.tags(&db_name),
            name: db_name,
        })?;
        Ok(db_id)
    }
}

/// Listener port for a database engine name.
fn default_db_port(engine: &str) -> u16 {
    match engine {
        e if e.starts_with("postgres") || e.contains("postgresql") => 5432,
        e if e.starts_with("mysql") || e.starts_with("mariadb") || e.contains("mysql") => 3306,
        e if e.starts_with("sqlserver") => 1433,
        e if e.starts_with("oracle") => 1521,
        _ => 5432,
    }
}
