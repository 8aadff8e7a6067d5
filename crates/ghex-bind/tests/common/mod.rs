//! A small GHEX-like native module for integration tests.
//!
//! Mirrors the shape of the real bindings: a transport context handing out
//! communicators, a 3D domain descriptor and halo generator exported under
//! their rendered template names, field descriptors per element type, and a
//! communication object whose `exchange` is overloaded for one to three
//! fields.

#![allow(dead_code)]

use std::sync::Arc;

use ghex_bind::ghex_sdk::{
    AbiResult, CallArgs, NativeClass, NativeError, NativeHandle, NativeInstance,
    NativeModule, NativeValue, ObjectSchema,
};
use parking_lot::Mutex;

pub const HALO_GENERATOR: &str = "gridtools::ghex::structured::regular::halo_generator";
pub const DOMAIN_DESCRIPTOR: &str = "gridtools::ghex::structured::regular::domain_descriptor";
pub const FIELD_DESCRIPTOR: &str = "gridtools::ghex::structured::regular::field_descriptor";
pub const HALO_GENERATOR_3D: &str =
    "gridtools::ghex::structured::regular::halo_generator<int, std::integral_constant<int, 3> >";
pub const DOMAIN_DESCRIPTOR_3D: &str =
    "gridtools::ghex::structured::regular::domain_descriptor<int, std::integral_constant<int, 3> >";

// ============================================================================
// Transport layer
// ============================================================================

pub struct Context {
    rank: i64,
    size: i64,
    communicator_class: Arc<NativeClass>,
}

impl NativeInstance for Context {
    fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        Err(NativeError::Raised(format!("context has no field {}", name)))
    }

    fn call_method(&self, name: &str, _args: &CallArgs) -> AbiResult<NativeValue> {
        match name {
            "rank" => Ok(NativeValue::Int(self.rank)),
            "size" => Ok(NativeValue::Int(self.size)),
            "get_communicator" => Ok(NativeValue::Object(self.communicator_class.adopt(
                Communicator {
                    rank: self.rank,
                    size: self.size,
                },
            ))),
            _ => Err(NativeError::Raised(format!("context has no method {}", name))),
        }
    }
}

pub struct Communicator {
    pub rank: i64,
    pub size: i64,
}

impl NativeInstance for Communicator {
    fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        Err(NativeError::Raised(format!("communicator has no field {}", name)))
    }

    fn call_method(&self, name: &str, _args: &CallArgs) -> AbiResult<NativeValue> {
        match name {
            "rank" => Ok(NativeValue::Int(self.rank)),
            "size" => Ok(NativeValue::Int(self.size)),
            _ => Err(NativeError::Raised(format!("communicator has no method {}", name))),
        }
    }
}

// ============================================================================
// Structured grid
// ============================================================================

pub struct DomainDescriptor {
    pub id: i64,
    pub first: Vec<i64>,
    pub last: Vec<i64>,
}

impl NativeInstance for DomainDescriptor {
    fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        match name {
            "domain_id" => Ok(NativeValue::Int(self.id)),
            "first" => Ok(NativeValue::from(self.first.clone())),
            "last" => Ok(NativeValue::from(self.last.clone())),
            _ => Err(NativeError::Raised(format!("domain has no field {}", name))),
        }
    }

    fn call_method(&self, name: &str, _args: &CallArgs) -> AbiResult<NativeValue> {
        Err(NativeError::Raised(format!("domain has no method {}", name)))
    }
}

pub struct HaloGenerator {
    first: Vec<i64>,
    last: Vec<i64>,
    halos: Vec<i64>,
    periodic: Vec<bool>,
    box2_class: Arc<NativeClass>,
    box_class: Arc<NativeClass>,
}

impl HaloGenerator {
    fn make_box(&self, first: Vec<i64>, last: Vec<i64>) -> NativeValue {
        NativeValue::Object(self.box_class.adopt(BoxInstance { first, last }))
    }
}

impl NativeInstance for HaloGenerator {
    fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        match name {
            "periodic" => Ok(NativeValue::from(self.periodic.clone())),
            _ => Err(NativeError::Raised(format!("halo generator has no field {}", name))),
        }
    }

    fn call_method(&self, name: &str, args: &CallArgs) -> AbiResult<NativeValue> {
        if name != "__call__" {
            return Err(NativeError::Raised(format!("halo generator has no method {}", name)));
        }
        let domain: NativeHandle = args.get(0, "domain")?;
        let domain = domain.expect_instance::<DomainDescriptor>(DOMAIN_DESCRIPTOR_3D)?;

        let mut global_first = Vec::with_capacity(3);
        let mut global_last = Vec::with_capacity(3);
        let mut local_first = Vec::with_capacity(3);
        let mut local_last = Vec::with_capacity(3);
        for dim in 0..3 {
            let (lo, hi) = (self.halos[2 * dim], self.halos[2 * dim + 1]);
            let extent = self.last[dim] - self.first[dim] + 1;
            let wrap = |i: i64| {
                if self.periodic[dim] {
                    (i - self.first[dim]).rem_euclid(extent) + self.first[dim]
                } else {
                    i
                }
            };
            global_first.push(wrap(domain.first[dim] - lo));
            global_last.push(wrap(domain.last[dim] + hi));
            local_first.push(-lo);
            local_last.push(domain.last[dim] - domain.first[dim] + hi);
        }

        let local = self.make_box(local_first, local_last);
        let global = self.make_box(global_first, global_last);
        Ok(NativeValue::Object(self.box2_class.adopt(Box2 { local, global })))
    }
}

pub struct Box2 {
    local: NativeValue,
    global: NativeValue,
}

impl NativeInstance for Box2 {
    fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        match name {
            "local" => Ok(self.local.clone()),
            "global_" => Ok(self.global.clone()),
            _ => Err(NativeError::Raised(format!("Box2 has no field {}", name))),
        }
    }

    fn call_method(&self, name: &str, _args: &CallArgs) -> AbiResult<NativeValue> {
        Err(NativeError::Raised(format!("Box2 has no method {}", name)))
    }
}

pub struct BoxInstance {
    first: Vec<i64>,
    last: Vec<i64>,
}

impl NativeInstance for BoxInstance {
    fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        match name {
            "first" => Ok(NativeValue::from(self.first.clone())),
            "last" => Ok(NativeValue::from(self.last.clone())),
            _ => Err(NativeError::Raised(format!("Box has no field {}", name))),
        }
    }

    fn call_method(&self, name: &str, _args: &CallArgs) -> AbiResult<NativeValue> {
        Err(NativeError::Raised(format!("Box has no method {}", name)))
    }
}

// ============================================================================
// Fields and communication
// ============================================================================

pub struct FieldDescriptor {
    pub domain: NativeHandle,
    pub data: Mutex<Vec<f64>>,
}

impl NativeInstance for FieldDescriptor {
    fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        match name {
            "domain" => Ok(NativeValue::Object(self.domain.clone())),
            "size" => NativeValue::try_from(self.data.lock().len()),
            _ => Err(NativeError::Raised(format!("field has no field {}", name))),
        }
    }

    fn call_method(&self, name: &str, args: &CallArgs) -> AbiResult<NativeValue> {
        match name {
            "sum" => Ok(NativeValue::Float(self.data.lock().iter().sum())),
            "fill" => {
                let value: f64 = args.get(0, "value")?;
                self.data.lock().iter_mut().for_each(|x| *x = value);
                Ok(NativeValue::Null)
            }
            _ => Err(NativeError::Raised(format!("field has no method {}", name))),
        }
    }
}

pub struct CommunicationObject {
    pub communicator: NativeHandle,
    pub exchanged: Mutex<Vec<NativeHandle>>,
    handle_class: Arc<NativeClass>,
}

impl NativeInstance for CommunicationObject {
    fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        match name {
            "exchange_count" => NativeValue::try_from(self.exchanged.lock().len()),
            _ => Err(NativeError::Raised(format!("communication object has no field {}", name))),
        }
    }

    fn call_method(&self, name: &str, args: &CallArgs) -> AbiResult<NativeValue> {
        if name != "exchange" {
            return Err(NativeError::Raised(format!(
                "communication object has no method {}",
                name
            )));
        }
        let mut fields = Vec::with_capacity(args.len());
        for value in args.positional() {
            let handle: NativeHandle = value.extract()?;
            handle.expect_instance::<FieldDescriptor>("field_descriptor")?;
            fields.push(handle);
        }
        let count = fields.len();
        self.exchanged.lock().extend(fields);
        Ok(NativeValue::Object(self.handle_class.adopt(CommunicationHandle {
            fields: count,
            done: Mutex::new(false),
        })))
    }
}

pub struct CommunicationHandle {
    pub fields: usize,
    pub done: Mutex<bool>,
}

impl NativeInstance for CommunicationHandle {
    fn get_field(&self, name: &str) -> AbiResult<NativeValue> {
        match name {
            "fields" => NativeValue::try_from(self.fields),
            _ => Err(NativeError::Raised(format!("handle has no field {}", name))),
        }
    }

    fn call_method(&self, name: &str, _args: &CallArgs) -> AbiResult<NativeValue> {
        match name {
            "wait" => {
                *self.done.lock() = true;
                Ok(NativeValue::Null)
            }
            "is_ready" => Ok(NativeValue::Bool(*self.done.lock())),
            _ => Err(NativeError::Raised(format!("handle has no method {}", name))),
        }
    }
}

// ============================================================================
// Module
// ============================================================================

fn field_class(element: &str, domain_class: &str) -> NativeClass {
    let name = format!("{}<{}>", FIELD_DESCRIPTOR, element);
    let schema = ObjectSchema::builder(&name)
        .field("domain")
        .field("size")
        .method("sum", 0)
        .method("fill", 1)
        .build();
    let domain_class = domain_class.to_string();
    NativeClass::new(schema).with_constructor(move |args: &CallArgs| {
        let domain: NativeHandle = args.get(0, "domain")?;
        if domain.type_name() != domain_class {
            return Err(NativeError::TypeMismatch {
                expected: domain_class.clone(),
                got: domain.type_name().to_string(),
            });
        }
        let data: Vec<f64> = args.get(1, "data")?;
        Ok(FieldDescriptor {
            domain,
            data: Mutex::new(data),
        })
    })
}

/// Build the mock module
pub fn ghex_module() -> Arc<NativeModule> {
    let mut module = NativeModule::new("ghex", "0.3.0");

    let communicator_class = module.register_class(NativeClass::new(
        ObjectSchema::builder("communicator")
            .method("rank", 0)
            .method("size", 0)
            .build(),
    ));

    module.register_class(
        NativeClass::new(
            ObjectSchema::builder("context")
                .method("rank", 0)
                .method("size", 0)
                .method("get_communicator", 0)
                .build(),
        )
        .with_constructor(move |args: &CallArgs| {
            let rank: i64 = args.get(0, "rank")?;
            let size: i64 = args.get(1, "size")?;
            if size <= 0 || rank < 0 || rank >= size {
                return Err(NativeError::ArgumentError(format!(
                    "rank {} out of range for size {}",
                    rank, size
                )));
            }
            Ok(Context {
                rank,
                size,
                communicator_class: Arc::clone(&communicator_class),
            })
        }),
    );

    module.register_class(
        NativeClass::new(
            ObjectSchema::builder(DOMAIN_DESCRIPTOR_3D)
                .field("domain_id")
                .field("first")
                .field("last")
                .build(),
        )
        .with_constructor(|args: &CallArgs| {
            let first: Vec<i64> = args.get(1, "first")?;
            let last: Vec<i64> = args.get(2, "last")?;
            if first.len() != 3 || last.len() != 3 {
                return Err(NativeError::ArgumentError(
                    "domain bounds must have 3 entries".to_string(),
                ));
            }
            Ok(DomainDescriptor {
                id: args.get(0, "id")?,
                first,
                last,
            })
        }),
    );

    let box_class = module.register_class(NativeClass::new(
        ObjectSchema::builder("Box").field("first").field("last").build(),
    ));
    let box2_class = module.register_class(NativeClass::new(
        ObjectSchema::builder("Box2").field("local").field("global_").build(),
    ));

    module.register_class(
        NativeClass::new(
            ObjectSchema::builder(HALO_GENERATOR_3D)
                .field("periodic")
                .method("__call__", 1)
                .build(),
        )
        .with_constructor(move |args: &CallArgs| {
            let first: Vec<i64> = args.get(0, "first")?;
            let last: Vec<i64> = args.get(1, "last")?;
            let halos: Vec<i64> = args.get(2, "halos")?;
            let periodic: Vec<bool> = args.get(3, "periodic")?;
            if first.len() != 3 || last.len() != 3 || halos.len() != 6 || periodic.len() != 3 {
                return Err(NativeError::ArgumentError(
                    "expected 3 bounds, 6 halos and 3 periodicity flags".to_string(),
                ));
            }
            Ok(HaloGenerator {
                first,
                last,
                halos,
                periodic,
                box2_class: Arc::clone(&box2_class),
                box_class: Arc::clone(&box_class),
            })
        }),
    );

    module.register_class(field_class("double", DOMAIN_DESCRIPTOR_3D));
    module.register_class(field_class("float", DOMAIN_DESCRIPTOR_3D));

    let handle_class = module.register_class(NativeClass::new(
        ObjectSchema::builder("communication_handle")
            .field("fields")
            .method("wait", 0)
            .method("is_ready", 0)
            .build(),
    ));

    module.register_class(
        NativeClass::new(
            ObjectSchema::builder("communication_object")
                .field("exchange_count")
                .method("exchange", 1)
                .method("exchange", 2)
                .method("exchange", 3)
                .build(),
        )
        .with_constructor(move |args: &CallArgs| {
            let communicator: NativeHandle = args.get(0, "communicator")?;
            communicator.expect_instance::<Communicator>("communicator")?;
            Ok(CommunicationObject {
                communicator,
                exchanged: Mutex::new(Vec::new()),
                handle_class: Arc::clone(&handle_class),
            })
        }),
    );

    Arc::new(module)
}
