//! Resource declarations handed to a provisioning client.

use crate::models::{NetworkBlock, ZoneId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier returned by the provisioning client for a declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type Tags = BTreeMap<String, String>;

/// A resource the stack asks the provider to create.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Resource {
    #[serde(rename_all = "camelCase")]
    Vpc {
        name: String,
        cidr_block: NetworkBlock,
        enable_dns_support: bool,
        enable_dns_hostnames: bool,
        tags: Tags,
    },
    #[serde(rename_all = "camelCase")]
    InternetGateway {
        name: String,
        vpc_id: ResourceId,
        tags: Tags,
    },
    #[serde(rename_all = "camelCase")]
    RouteTable {
        name: String,
        vpc_id: ResourceId,
        tags: Tags,
    },
    #[serde(rename_all = "camelCase")]
    Route {
        name: String,
        route_table_id: ResourceId,
        destination_cidr_block: NetworkBlock,
        gateway_id: ResourceId,
    },
    #[serde(rename_all = "camelCase")]
    Subnet {
        name: String,
        vpc_id: ResourceId,
        cidr_block: NetworkBlock,
        availability_zone: ZoneId,
        map_public_ip_on_launch: bool,
        tags: Tags,
    },
    #[serde(rename_all = "camelCase")]
    RouteTableAssociation {
        name: String,
        subnet_id: ResourceId,
        route_table_id: ResourceId,
    },
    #[serde(rename_all = "camelCase")]
    SecurityGroup {
        name: String,
        vpc_id: ResourceId,
        ingress_ports: Vec<u16>,
        tags: Tags,
    },
    #[serde(rename_all = "camelCase")]
    LoadBalancer {
        name: String,
        subnet_ids: Vec<ResourceId>,
        security_group_ids: Vec<ResourceId>,
        port: u16,
        tags: Tags,
    },
    #[serde(rename_all = "camelCase")]
    AutoScalingGroup {
        name: String,
        instance_type: String,
        min_size: u32,
        max_size: u32,
        desired_capacity: u32,
        subnet_ids: Vec<ResourceId>,
        load_balancer_id: ResourceId,
        tags: Tags,
    },
    #[serde(rename_all = "camelCase")]
    DbSubnetGroup {
        name: String,
        subnet_ids: Vec<ResourceId>,
        tags: Tags,
    },
    #[serde(rename_all = "camelCase")]
    DbInstance {
        name: String,
        engine: String,
        engine_version: Option<String>,
        instance_class: String,
        allocated_storage_gib: u32,
        db_subnet_group_id: ResourceId,
        security_group_ids: Vec<ResourceId>,
        tags: Tags,
    },
    #[serde(rename_all = "camelCase")]
    DnsRecord {
        name: String,
        fqdn: String,
        ttl: u32,
        target_id: ResourceId,
    },
}

impl Resource {
    /// Short kind name, used for synthetic ids and logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::Vpc { .. } => "vpc",
            Resource::InternetGateway { .. } => "igw",
            Resource::RouteTable { .. } => "rtb",
            Resource::Route { .. } => "route",
            Resource::Subnet { .. } => "subnet",
            Resource::RouteTableAssociation { .. } => "rtbassoc",
            Resource::SecurityGroup { .. } => "sg",
            Resource::LoadBalancer { .. } => "lb",
            Resource::AutoScalingGroup { .. } => "asg",
            Resource::DbSubnetGroup { .. } => "dbsubnet",
            Resource::DbInstance { .. } => "db",
            Resource::DnsRecord { .. } => "dns",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Resource::Vpc { name, .. }
            | Resource::InternetGateway { name, .. }
            | Resource::RouteTable { name, .. }
            | Resource::Route { name, .. }
            | Resource::Subnet { name, .. }
            | Resource::RouteTableAssociation { name, .. }
            | Resource::SecurityGroup { name, .. }
            | Resource::LoadBalancer { name, .. }
            | Resource::AutoScalingGroup { name, .. }
            | Resource::DbSubnetGroup { name, .. }
            | Resource::DbInstance { name, .. }
            | Resource::DnsRecord { name, .. } => name,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_tagged() {
        let subnet = Resource::Subnet {
            name: "publicSubnet0".to_string(),
            vpc_id: ResourceId("vpc-0".to_string()),
            cidr_block: NetworkBlock::new("10.0.0.0/18").unwrap(),
            availability_zone: ZoneId::from("us-east-1a"),
            map_public_ip_on_launch: true,
            tags: Tags::new(),
        };
        let json = serde_json::to_value(&subnet).unwrap();
        assert_eq!(json["type"], "subnet");
        assert_eq!(json["cidrBlock"], "10.0.0.0/18");
        assert_eq!(json["availabilityZone"], "us-east-1a");
        assert_eq!(json["mapPublicIpOnLaunch"], true);
        assert_eq!(subnet.to_string(), "subnet:publicSubnet0");
    }
}
