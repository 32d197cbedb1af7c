//! Byte-level builder for major-52 class files, so the tests do not depend
//! on a JDK being installed.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub struct ClassFileBuilder {
    pool: Vec<u8>,
    next_index: u16,
    utf8_cache: HashMap<String, u16>,
    class_cache: HashMap<String, u16>,
    this_class: u16,
    super_class: u16,
    fields: Vec<u8>,
    field_count: u16,
    methods: Vec<u8>,
    method_count: u16,
    class_attributes: Vec<u8>,
    class_attribute_count: u16,
}

impl ClassFileBuilder {
    pub fn new(this_class: &str, super_class: &str) -> Self {
        let mut builder = Self {
            pool: Vec::new(),
            next_index: 1,
            utf8_cache: HashMap::new(),
            class_cache: HashMap::new(),
            this_class: 0,
            super_class: 0,
            fields: Vec::new(),
            field_count: 0,
            methods: Vec::new(),
            method_count: 0,
            class_attributes: Vec::new(),
            class_attribute_count: 0,
        };
        builder.this_class = builder.class(this_class);
        builder.super_class = builder.class(super_class);
        builder
    }

    fn alloc(&mut self, slots: u16) -> u16 {
        let index = self.next_index;
        self.next_index += slots;
        index
    }

    pub fn this_class_index(&self) -> u16 {
        self.this_class
    }

    pub fn utf8(&mut self, value: &str) -> u16 {
        if let Some(&index) = self.utf8_cache.get(value) {
            return index;
        }
        self.pool.push(1);
        push_u16(&mut self.pool, value.len() as u16);
        self.pool.extend_from_slice(value.as_bytes());
        let index = self.alloc(1);
        self.utf8_cache.insert(value.to_string(), index);
        index
    }

    pub fn class(&mut self, name: &str) -> u16 {
        if let Some(&index) = self.class_cache.get(name) {
            return index;
        }
        let name_index = self.utf8(name);
        self.pool.push(7);
        push_u16(&mut self.pool, name_index);
        let index = self.alloc(1);
        self.class_cache.insert(name.to_string(), index);
        index
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        self.pool.push(3);
        self.pool.extend_from_slice(&value.to_be_bytes());
        self.alloc(1)
    }

    pub fn float(&mut self, value: f32) -> u16 {
        self.pool.push(4);
        self.pool.extend_from_slice(&value.to_be_bytes());
        self.alloc(1)
    }

    pub fn long(&mut self, value: i64) -> u16 {
        self.pool.push(5);
        self.pool.extend_from_slice(&value.to_be_bytes());
        self.alloc(2)
    }

    pub fn double(&mut self, value: f64) -> u16 {
        self.pool.push(6);
        self.pool.extend_from_slice(&value.to_be_bytes());
        self.alloc(2)
    }

    pub fn string(&mut self, value: &str) -> u16 {
        let string_index = self.utf8(value);
        self.pool.push(8);
        push_u16(&mut self.pool, string_index);
        self.alloc(1)
    }

    pub fn name_and_type(&mut self, name: &str, desc: &str) -> u16 {
        let name_index = self.utf8(name);
        let desc_index = self.utf8(desc);
        self.pool.push(12);
        push_u16(&mut self.pool, name_index);
        push_u16(&mut self.pool, desc_index);
        self.alloc(1)
    }

    pub fn field_ref(&mut self, class: &str, name: &str, desc: &str) -> u16 {
        let class_index = self.class(class);
        let nat_index = self.name_and_type(name, desc);
        self.pool.push(9);
        push_u16(&mut self.pool, class_index);
        push_u16(&mut self.pool, nat_index);
        self.alloc(1)
    }

    pub fn method_ref(&mut self, class: &str, name: &str, desc: &str) -> u16 {
        let class_index = self.class(class);
        let nat_index = self.name_and_type(name, desc);
        self.pool.push(10);
        push_u16(&mut self.pool, class_index);
        push_u16(&mut self.pool, nat_index);
        self.alloc(1)
    }

    pub fn field(&mut self, flags: u16, name: &str, desc: &str) {
        self.field_with(flags, name, desc, None);
    }

    pub fn field_with_constant(&mut self, flags: u16, name: &str, desc: &str, constant: u16) {
        self.field_with(flags, name, desc, Some(constant));
    }

    fn field_with(&mut self, flags: u16, name: &str, desc: &str, constant: Option<u16>) {
        let name_index = self.utf8(name);
        let desc_index = self.utf8(desc);
        let constant_attr = constant.map(|value_index| (self.utf8("ConstantValue"), value_index));
        push_u16(&mut self.fields, flags);
        push_u16(&mut self.fields, name_index);
        push_u16(&mut self.fields, desc_index);
        match constant_attr {
            Some((attr_name_index, value_index)) => {
                push_u16(&mut self.fields, 1);
                push_u16(&mut self.fields, attr_name_index);
                push_u32(&mut self.fields, 2);
                push_u16(&mut self.fields, value_index);
            }
            None => push_u16(&mut self.fields, 0),
        }
        self.field_count += 1;
    }

    pub fn method(
        &mut self,
        flags: u16,
        name: &str,
        desc: &str,
        max_stack: u16,
        max_locals: u16,
        code: &[u8],
    ) {
        let name_index = self.utf8(name);
        let desc_index = self.utf8(desc);
        let code_attr_name = self.utf8("Code");
        push_u16(&mut self.methods, flags);
        push_u16(&mut self.methods, name_index);
        push_u16(&mut self.methods, desc_index);
        push_u16(&mut self.methods, 1);
        push_u16(&mut self.methods, code_attr_name);
        push_u32(&mut self.methods, 12 + code.len() as u32);
        push_u16(&mut self.methods, max_stack);
        push_u16(&mut self.methods, max_locals);
        push_u32(&mut self.methods, code.len() as u32);
        self.methods.extend_from_slice(code);
        push_u16(&mut self.methods, 0); // exception table
        push_u16(&mut self.methods, 0); // nested attributes
        self.method_count += 1;
    }

    pub fn class_attribute(&mut self, name: &str, data: &[u8]) {
        let name_index = self.utf8(name);
        push_u16(&mut self.class_attributes, name_index);
        push_u32(&mut self.class_attributes, data.len() as u32);
        self.class_attributes.extend_from_slice(data);
        self.class_attribute_count += 1;
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        push_u32(&mut out, 0xCAFE_BABE);
        push_u16(&mut out, 0); // minor
        push_u16(&mut out, 52); // major
        push_u16(&mut out, self.next_index);
        out.extend_from_slice(&self.pool);
        push_u16(&mut out, ACC_PUBLIC | ACC_SUPER);
        push_u16(&mut out, self.this_class);
        push_u16(&mut out, self.super_class);
        push_u16(&mut out, 0); // interfaces
        push_u16(&mut out, self.field_count);
        out.extend_from_slice(&self.fields);
        push_u16(&mut out, self.method_count);
        out.extend_from_slice(&self.methods);
        push_u16(&mut out, self.class_attribute_count);
        out.extend_from_slice(&self.class_attributes);
        out
    }
}

pub fn write_class(dir: &Path, binary_name: &str, bytes: &[u8]) {
    let path = dir.join(format!("{binary_name}.class"));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// Big-endian u16 split, for splicing constant pool indices into code.
pub fn idx(index: u16) -> [u8; 2] {
    index.to_be_bytes()
}
