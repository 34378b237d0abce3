//! Built-in catalogue of generated API domains.

use super::domain::ApiDomainSpec;
use super::resource::{ResourceOperations, ResourceType};

fn config(name: &str, description: &str, collection: &str) -> ResourceType {
    ResourceType::namespaced(
        name,
        description,
        format!("/api/config/namespaces/{{namespace}}/{}", collection),
    )
}

/// Every API domain shipped with the shell
pub fn builtin_domains() -> Vec<ApiDomainSpec> {
    vec![
        ApiDomainSpec::new("load_balancer", "HTTP and TCP load balancing")
            .alias("lb")
            .resource(config("http_loadbalancer", "HTTP load balancer", "http_loadbalancers"))
            .resource(config("tcp_loadbalancer", "TCP load balancer", "tcp_loadbalancers"))
            .resource(config("origin_pool", "Origin pool", "origin_pools"))
            .resource(config("healthcheck", "Origin health check", "healthchecks")),
        ApiDomainSpec::new("security", "Web application and API protection")
            .alias("sec")
            .resource(config("app_firewall", "Web application firewall", "app_firewalls"))
            .resource(config("service_policy", "Service policy", "service_policys"))
            .resource(config("rate_limiter", "Rate limiter", "rate_limiters"))
            .resource(config("ip_prefix_set", "IP prefix set", "ip_prefix_sets")),
        ApiDomainSpec::new("networking", "Network connectivity")
            .alias("net")
            .resource(config("network_connector", "Network connector", "network_connectors"))
            .resource(config("network_firewall", "Network firewall", "network_firewalls"))
            .resource(config("virtual_network", "Virtual network", "virtual_networks")),
        ApiDomainSpec::new("dns", "DNS zones and DNS load balancing")
            .resource(ResourceType::namespaced(
                "dns_zone",
                "DNS zone",
                "/api/config/dns/namespaces/{namespace}/dns_zones",
            ))
            .resource(ResourceType::namespaced(
                "dns_load_balancer",
                "DNS load balancer",
                "/api/config/dns/namespaces/{namespace}/dns_load_balancers",
            )),
        ApiDomainSpec::new("infrastructure", "Sites and cloud credentials")
            .alias("infra")
            .resource(config("aws_vpc_site", "AWS VPC site", "aws_vpc_sites"))
            .resource(config("azure_vnet_site", "Azure VNet site", "azure_vnet_sites"))
            .resource(config("cloud_credentials", "Cloud credentials", "cloud_credentialss"))
            .resource(
                config("site", "Registered site", "sites").operations(ResourceOperations::read_only()),
            ),
        ApiDomainSpec::new("identity", "Users, roles and credentials")
            .alias("iam")
            .resource(ResourceType::global(
                "user",
                "Tenant user",
                "/api/web/custom/namespaces/system/users",
            ))
            .resource(
                ResourceType::global("role", "Role", "/api/web/custom/namespaces/system/roles")
                    .operations(ResourceOperations::read_only()),
            )
            .resource(ResourceType::global(
                "api_credential",
                "API credential",
                "/api/web/namespaces/system/api_credentials",
            )),
        ApiDomainSpec::new("observability", "Alerts and synthetic monitoring")
            .alias("obs")
            .alias("o11y")
            .resource(config("alert_policy", "Alert policy", "alert_policys"))
            .resource(config("alert_receiver", "Alert receiver", "alert_receivers"))
            .resource(config("http_monitor", "Synthetic HTTP monitor", "v1_http_monitors")),
        ApiDomainSpec::new("api_security", "API discovery and definitions")
            .alias("apisec")
            .resource(config("api_definition", "API definition", "api_definitions"))
            .resource(config("api_discovery", "API discovery", "api_discoverys")),
        ApiDomainSpec::new("service_mesh", "Virtual sites and service mesh")
            .alias("mesh")
            .resource(config("virtual_site", "Virtual site", "virtual_sites"))
            .resource(config("virtual_k8s", "Virtual Kubernetes", "virtual_k8ss")),
        ApiDomainSpec::new("ai_intelligence", "AI assistant")
            .alias("ai")
            .resource(
                config("ai_data_bank", "AI data bank", "ai_data_banks")
                    .operations(ResourceOperations::read_only()),
            ),
    ]
}
