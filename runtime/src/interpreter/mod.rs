use crate::classfile::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
use crate::error::JvmError;
use crate::heap::HeapRef;
use crate::interpreter::frame::Frame;
use crate::interpreter::handlers::*;
use crate::interpreter::instruction::Instruction;
use crate::keys::{FieldKey, MethodKey};
use crate::rt::JAVA_LANG_OBJECT;
use crate::rt::class::InstanceClass;
use crate::rt::method::CodeBody;
use crate::vm::{Value, VirtualMachine};
use smallvec::SmallVec;
use std::ops::ControlFlow;
use std::rc::Rc;

pub mod frame;
mod handlers;
pub mod instruction;

pub struct Interpreter;

impl Interpreter {
    /// Runs `code` to completion against `frame`. Nested invocations recurse
    /// through the host stack; falling off the end of the code returns void.
    pub fn interpret_method(
        vm: &mut VirtualMachine,
        class: &Rc<InstanceClass>,
        code: &CodeBody,
        frame: &mut Frame,
    ) -> Result<Option<Value>, JvmError> {
        while frame.pc < code.code.len() {
            let instruction = Instruction::new_at(&code.code, frame.pc)?;
            if let ControlFlow::Break(result) =
                Self::interpret_instruction(frame, class, instruction, vm)?
            {
                return Ok(result);
            }
        }
        Ok(None)
    }

    fn interpret_instruction(
        frame: &mut Frame,
        class: &Rc<InstanceClass>,
        instruction: Instruction,
        vm: &mut VirtualMachine,
    ) -> Result<ControlFlow<Option<Value>>, JvmError> {
        let is_branch = instruction.is_branch();
        let size = instruction.byte_size();

        match instruction {
            Instruction::Nop => {}
            Instruction::AconstNull => handle_aconst_null(frame)?,
            Instruction::Iconst(value) => handle_iconst(frame, value)?,
            Instruction::Bipush(value) => handle_bipush(frame, value)?,
            Instruction::Sipush(value) => handle_sipush(frame, value)?,
            Instruction::Iload(index) => handle_iload(frame, index)?,
            Instruction::Aload(index) => handle_aload(frame, index)?,
            Instruction::Istore(index) => handle_istore(frame, index)?,
            Instruction::Astore(index) => handle_astore(frame, index)?,
            Instruction::Pop => handle_pop(frame)?,
            Instruction::Dup => handle_dup(frame)?,
            Instruction::Iadd => handle_iadd(frame)?,
            Instruction::Isub => handle_isub(frame)?,
            Instruction::Imul => handle_imul(frame)?,
            Instruction::Idiv => handle_idiv(frame)?,
            Instruction::Irem => handle_irem(frame)?,
            Instruction::Ineg => handle_ineg(frame)?,
            Instruction::Iinc(index, delta) => handle_iinc(frame, index, delta)?,
            Instruction::IfEq(offset) => handle_if_int(frame, offset, size, |v| v == 0)?,
            Instruction::IfNe(offset) => handle_if_int(frame, offset, size, |v| v != 0)?,
            Instruction::IfLt(offset) => handle_if_int(frame, offset, size, |v| v < 0)?,
            Instruction::IfGe(offset) => handle_if_int(frame, offset, size, |v| v >= 0)?,
            Instruction::IfGt(offset) => handle_if_int(frame, offset, size, |v| v > 0)?,
            Instruction::IfLe(offset) => handle_if_int(frame, offset, size, |v| v <= 0)?,
            Instruction::IfIcmpeq(offset) => handle_if_icmp(frame, offset, size, |a, b| a == b)?,
            Instruction::IfIcmpne(offset) => handle_if_icmp(frame, offset, size, |a, b| a != b)?,
            Instruction::IfIcmplt(offset) => handle_if_icmp(frame, offset, size, |a, b| a < b)?,
            Instruction::IfIcmpge(offset) => handle_if_icmp(frame, offset, size, |a, b| a >= b)?,
            Instruction::IfIcmpgt(offset) => handle_if_icmp(frame, offset, size, |a, b| a > b)?,
            Instruction::IfIcmple(offset) => handle_if_icmp(frame, offset, size, |a, b| a <= b)?,
            Instruction::Goto(offset) => handle_goto(frame, offset)?,
            Instruction::Getstatic(index) => handle_getstatic(frame, class, vm, index)?,
            Instruction::Putstatic(index) => handle_putstatic(frame, class, vm, index)?,
            Instruction::Getfield(index) => handle_getfield(frame, class, vm, index)?,
            Instruction::Putfield(index) => handle_putfield(frame, class, vm, index)?,
            Instruction::InvokeVirtual(index) => handle_invokevirtual(frame, class, vm, index)?,
            Instruction::InvokeSpecial(index) => handle_invokespecial(frame, class, vm, index)?,
            Instruction::InvokeStatic(index) => handle_invokestatic(frame, class, vm, index)?,
            Instruction::New(index) => handle_new(frame, class, vm, index)?,
            Instruction::Ireturn => {
                return Ok(ControlFlow::Break(Some(handle_ireturn(frame)?)));
            }
            Instruction::Return => {
                return Ok(ControlFlow::Break(None));
            }
        }

        if !is_branch {
            frame.pc += size;
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Static resolution: walk up from the referenced class; the first match
    /// with the static bit set wins.
    pub(crate) fn resolve_static_method(
        vm: &mut VirtualMachine,
        owner: &str,
        key: &MethodKey,
    ) -> Result<(Rc<InstanceClass>, usize), JvmError> {
        let mut current = vm.load_class(owner)?;
        loop {
            if let Some((index, method)) = current.find_method(&key.name, &key.desc) {
                if method.is_static() {
                    if method.code().is_none() {
                        return Err(JvmError::MissingCode {
                            class: current.name().to_string(),
                            name: key.name.clone(),
                        });
                    }
                    let found = current.clone();
                    return Ok((found, index));
                }
            }
            let super_name = match current.super_name() {
                Some(name) if name != JAVA_LANG_OBJECT => name.to_string(),
                _ => break,
            };
            current = vm.load_class(&super_name)?;
        }
        Err(JvmError::MethodNotFound {
            class: owner.to_string(),
            name: key.name.clone(),
            desc: key.desc.clone(),
        })
    }

    /// Instance resolution: walk up from `start`; the first non-static match
    /// wins. For `invokevirtual` the caller passes the receiver's dynamic
    /// class, for `invokespecial` the referenced class.
    pub(crate) fn resolve_instance_method(
        vm: &mut VirtualMachine,
        start: &Rc<InstanceClass>,
        key: &MethodKey,
    ) -> Result<(Rc<InstanceClass>, usize), JvmError> {
        let mut current = start.clone();
        loop {
            if let Some((index, method)) = current.find_method(&key.name, &key.desc) {
                if !method.is_static() {
                    if method.code().is_none() {
                        return Err(JvmError::MissingCode {
                            class: current.name().to_string(),
                            name: key.name.clone(),
                        });
                    }
                    let found = current.clone();
                    return Ok((found, index));
                }
            }
            let super_name = match current.super_name() {
                Some(name) if name != JAVA_LANG_OBJECT => name.to_string(),
                _ => break,
            };
            current = vm.load_class(&super_name)?;
        }
        Err(JvmError::MethodNotFound {
            class: start.name().to_string(),
            name: key.name.clone(),
            desc: key.desc.clone(),
        })
    }

    /// Field resolution: the first class in the super-chain declaring a
    /// matching name+descriptor with the right static bit. The declaring
    /// class is also the storage key.
    pub(crate) fn resolve_field(
        vm: &mut VirtualMachine,
        owner: &str,
        key: &FieldKey,
        expect_static: bool,
    ) -> Result<Rc<InstanceClass>, JvmError> {
        let mut current = vm.load_class(owner)?;
        loop {
            if current.find_field(key, expect_static).is_some() {
                return Ok(current);
            }
            let super_name = match current.super_name() {
                Some(name) if name != JAVA_LANG_OBJECT => name.to_string(),
                _ => break,
            };
            current = vm.load_class(&super_name)?;
        }
        Err(JvmError::FieldNotFound {
            class: owner.to_string(),
            name: key.name.clone(),
            desc: key.desc.clone(),
        })
    }

    /// Pops call arguments right-to-left and restores their declared order.
    pub(crate) fn pop_int_args(
        frame: &mut Frame,
        descriptor: &MethodDescriptor,
        desc: &str,
    ) -> Result<SmallVec<[i32; 8]>, JvmError> {
        for param in &descriptor.params {
            if !matches!(param, FieldType::Base(BaseType::Int)) {
                return Err(JvmError::UnsupportedParameter {
                    desc: desc.to_string(),
                });
            }
        }
        let mut args: SmallVec<[i32; 8]> = SmallVec::with_capacity(descriptor.params.len());
        for _ in 0..descriptor.params.len() {
            args.push(frame.pop_int()?);
        }
        args.reverse();
        Ok(args)
    }

    /// Builds the callee frame (receiver in slot 0 for instance calls, then
    /// the int arguments) and runs it.
    pub(crate) fn invoke_method(
        vm: &mut VirtualMachine,
        class: &Rc<InstanceClass>,
        method_index: usize,
        receiver: Option<HeapRef>,
        args: &[i32],
    ) -> Result<Option<Value>, JvmError> {
        let method = class.method(method_index);
        let code = method.code().ok_or_else(|| JvmError::MissingCode {
            class: class.name().to_string(),
            name: method.name().to_string(),
        })?;
        let mut frame = Frame::new(code.max_locals as usize, code.max_stack as usize);
        let mut slot = 0;
        if let Some(receiver) = receiver {
            frame.set_local_ref(0, Some(receiver))?;
            slot = 1;
        }
        for (offset, value) in args.iter().enumerate() {
            frame.set_local_int(slot + offset, *value)?;
        }
        Self::interpret_method(vm, class, code, &mut frame)
    }

    /// Propagates an int result to the caller; void leaves the caller stack
    /// untouched.
    pub(crate) fn push_return(
        frame: &mut Frame,
        ret: &ReturnType,
        desc: &str,
        result: Option<Value>,
    ) -> Result<(), JvmError> {
        match ret {
            ReturnType::Void => Ok(()),
            ReturnType::Field(FieldType::Base(BaseType::Int)) => match result {
                Some(Value::Int(value)) => frame.push_int(value),
                _ => frame.push_int(0),
            },
            _ => Err(JvmError::UnsupportedReturn {
                desc: desc.to_string(),
            }),
        }
    }
}
