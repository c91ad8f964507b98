//! Schema-aware traversal of decoded Docker API documents.
//!
//! The walker only follows the fields a [`Schema`] names. Anything absent or
//! of an unexpected type is skipped, and every other key is left in place so
//! the document re-encodes with its unrelated content intact.

use crate::context::RewriteContext;
use crate::mapper::map_path;
use crate::schema::{
    BIND_MOUNT_TYPE, BINDS, CONTAINER_SPEC, HOST_CONFIG, MOUNT_SOURCE, MOUNT_TYPE, MOUNTS,
    SPEC, Schema, TASK_TEMPLATE,
};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// Rewrites a decoded document in place.
///
/// Objects are walked directly; arrays (list endpoints) have each object
/// element walked with the same context. Other values are left untouched.
pub fn rewrite_document(schema: Schema, document: &mut Value, ctx: &RewriteContext) {
    match document {
        Value::Object(object) => rewrite_object(schema, object, ctx),
        Value::Array(items) => {
            for object in items.iter_mut().filter_map(Value::as_object_mut) {
                rewrite_object(schema, object, ctx);
            }
        }
        _ => {}
    }
}

fn rewrite_object(schema: Schema, object: &mut Object, ctx: &RewriteContext) {
    match schema {
        Schema::ContainerSummary | Schema::ContainerConfig => rewrite_container(object, ctx),
        Schema::ServiceSpec => rewrite_service_spec(object, ctx),
        Schema::Service => {
            if let Some(spec) = object_field(object, SPEC) {
                rewrite_service_spec(spec, ctx);
            }
        }
        Schema::Task => {
            if let Some(spec) = object_field(object, SPEC) {
                rewrite_task_spec(spec, ctx);
            }
        }
    }
}

fn rewrite_container(container: &mut Object, ctx: &RewriteContext) {
    if let Some(host_config) = object_field(container, HOST_CONFIG) {
        rewrite_host_config(host_config, ctx);
    }
    if let Some(mounts) = array_field(container, MOUNTS) {
        rewrite_mounts(mounts, ctx);
    }
}

fn rewrite_host_config(host_config: &mut Object, ctx: &RewriteContext) {
    if let Some(binds) = array_field(host_config, BINDS) {
        rewrite_binds(binds, ctx);
    }
    if let Some(mounts) = array_field(host_config, MOUNTS) {
        rewrite_mounts(mounts, ctx);
    }
}

fn rewrite_service_spec(spec: &mut Object, ctx: &RewriteContext) {
    if let Some(task_spec) = object_field(spec, TASK_TEMPLATE) {
        rewrite_task_spec(task_spec, ctx);
    }
}

fn rewrite_task_spec(task_spec: &mut Object, ctx: &RewriteContext) {
    if let Some(mounts) =
        object_field(task_spec, CONTAINER_SPEC).and_then(|spec| array_field(spec, MOUNTS))
    {
        rewrite_mounts(mounts, ctx);
    }
}

fn rewrite_binds(binds: &mut [Value], ctx: &RewriteContext) {
    for bind in binds {
        if let Value::String(binding) = bind {
            *binding = map_path(binding, ctx);
        }
    }
}

fn rewrite_mounts(mounts: &mut [Value], ctx: &RewriteContext) {
    for mount in mounts.iter_mut().filter_map(Value::as_object_mut) {
        let is_bind = mount.get(MOUNT_TYPE).and_then(Value::as_str) == Some(BIND_MOUNT_TYPE);
        if !is_bind {
            continue;
        }
        if let Some(Value::String(source)) = mount.get_mut(MOUNT_SOURCE) {
            *source = map_path(source, ctx);
        }
    }
}

fn object_field<'a>(object: &'a mut Object, key: &str) -> Option<&'a mut Object> {
    object.get_mut(key).and_then(Value::as_object_mut)
}

fn array_field<'a>(object: &'a mut Object, key: &str) -> Option<&'a mut Vec<Value>> {
    object.get_mut(key).and_then(Value::as_array_mut)
}
