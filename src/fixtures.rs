//! Embedded manifests the demo loads into the in-memory store

use std::collections::BTreeMap;

/// Path of the root kustomization.
pub const KUSTOMIZATION_PATH: &str = "kustomization.yaml";

/// Path of the Deployment resource.
pub const DEPLOYMENT_PATH: &str = "resources/deployment.yaml";

/// Path of the Service resource.
pub const SERVICE_PATH: &str = "resources/service.yaml";

pub const KUSTOMIZATION: &str = r#"
apiVersion: kustomize.config.k8s.io/v1beta1
kind: Kustomization
namespace: my-namespace
resources:
  - resources/deployment.yaml
  - resources/service.yaml
"#;

pub const DEPLOYMENT: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: my-deployment
spec:
  replicas: 3
  template:
    metadata:
      labels:
        app: my-app
    spec:
      containers:
        - name: my-container
          image: nginx
"#;

pub const SERVICE: &str = r#"
apiVersion: v1
kind: Service
metadata:
  labels:
    app: my-app
  name: my-app
spec:
  ports:
    - port: 8080
  selector:
    app: my-app
"#;

/// Relative path to file content, one entry per embedded manifest.
pub type FixtureSet = BTreeMap<&'static str, &'static str>;

/// Build the fixture set.
pub fn fixtures() -> FixtureSet {
    BTreeMap::from([
        (KUSTOMIZATION_PATH, KUSTOMIZATION),
        (DEPLOYMENT_PATH, DEPLOYMENT),
        (SERVICE_PATH, SERVICE),
    ])
}
