use crate::classfile::descriptor::{
    BaseType, FieldType, parse_field_descriptor, parse_method_descriptor,
};
use crate::error::JvmError;
use crate::interpreter::Interpreter;
use crate::interpreter::frame::Frame;
use crate::keys::{FieldKey, MethodKey};
use crate::rt::class::InstanceClass;
use crate::vm::{Value, VirtualMachine};
use std::rc::Rc;

/// Branch offsets are relative to the opcode address.
pub(super) fn branch16(pc: usize, offset: i16) -> usize {
    ((pc as isize) + (offset as isize)) as usize
}

fn field_ref_owned(class: &InstanceClass, index: u16) -> Result<(String, FieldKey), JvmError> {
    let view = class.cp().get_field_ref(index)?;
    Ok((
        view.class_name.to_string(),
        FieldKey::new(view.name, view.desc),
    ))
}

fn method_ref_owned(class: &InstanceClass, index: u16) -> Result<(String, MethodKey), JvmError> {
    let view = class.cp().get_method_ref(index)?;
    Ok((
        view.class_name.to_string(),
        MethodKey::new(view.name, view.desc),
    ))
}

fn push_field_value(frame: &mut Frame, ty: &FieldType, value: Value) -> Result<(), JvmError> {
    match ty {
        FieldType::Base(
            BaseType::Int | BaseType::Byte | BaseType::Char | BaseType::Short | BaseType::Boolean,
        ) => frame.push_int(value.as_int()?),
        FieldType::Object(_) | FieldType::Array { .. } => frame.push_ref(value.as_ref()?),
        other => Err(JvmError::UnsupportedFieldKind {
            desc: other.to_string(),
        }),
    }
}

fn pop_field_value(frame: &mut Frame, ty: &FieldType) -> Result<Value, JvmError> {
    match ty {
        FieldType::Base(
            BaseType::Int | BaseType::Byte | BaseType::Char | BaseType::Short | BaseType::Boolean,
        ) => Ok(Value::Int(frame.pop_int()?)),
        FieldType::Object(_) | FieldType::Array { .. } => Ok(Value::Ref(frame.pop_ref()?)),
        other => Err(JvmError::UnsupportedFieldKind {
            desc: other.to_string(),
        }),
    }
}

#[inline]
pub(super) fn handle_aconst_null(frame: &mut Frame) -> Result<(), JvmError> {
    frame.push_ref(None)
}

#[inline]
pub(super) fn handle_iconst(frame: &mut Frame, value: i32) -> Result<(), JvmError> {
    frame.push_int(value)
}

#[inline]
pub(super) fn handle_bipush(frame: &mut Frame, value: i8) -> Result<(), JvmError> {
    frame.push_int(value as i32)
}

#[inline]
pub(super) fn handle_sipush(frame: &mut Frame, value: i16) -> Result<(), JvmError> {
    frame.push_int(value as i32)
}

#[inline]
pub(super) fn handle_iload(frame: &mut Frame, index: u8) -> Result<(), JvmError> {
    let value = frame.get_local_int(index as usize)?;
    frame.push_int(value)
}

#[inline]
pub(super) fn handle_aload(frame: &mut Frame, index: u8) -> Result<(), JvmError> {
    let value = frame.get_local_ref(index as usize)?;
    frame.push_ref(value)
}

#[inline]
pub(super) fn handle_istore(frame: &mut Frame, index: u8) -> Result<(), JvmError> {
    let value = frame.pop_int()?;
    frame.set_local_int(index as usize, value)
}

#[inline]
pub(super) fn handle_astore(frame: &mut Frame, index: u8) -> Result<(), JvmError> {
    let value = frame.pop_ref()?;
    frame.set_local_ref(index as usize, value)
}

#[inline]
pub(super) fn handle_dup(frame: &mut Frame) -> Result<(), JvmError> {
    frame.dup()
}

/// A `Top` on top means a wide value is being dropped; take its value slot
/// with it so the stack never holds an orphaned lower half.
#[inline]
pub(super) fn handle_pop(frame: &mut Frame) -> Result<(), JvmError> {
    if matches!(frame.pop_slot()?, Value::Top) {
        frame.pop_slot()?;
    }
    Ok(())
}

#[inline]
pub(super) fn handle_iadd(frame: &mut Frame) -> Result<(), JvmError> {
    let b = frame.pop_int()?;
    let a = frame.pop_int()?;
    frame.push_int(a.wrapping_add(b))
}

#[inline]
pub(super) fn handle_isub(frame: &mut Frame) -> Result<(), JvmError> {
    let b = frame.pop_int()?;
    let a = frame.pop_int()?;
    frame.push_int(a.wrapping_sub(b))
}

#[inline]
pub(super) fn handle_imul(frame: &mut Frame) -> Result<(), JvmError> {
    let b = frame.pop_int()?;
    let a = frame.pop_int()?;
    frame.push_int(a.wrapping_mul(b))
}

#[inline]
pub(super) fn handle_idiv(frame: &mut Frame) -> Result<(), JvmError> {
    let b = frame.pop_int()?;
    let a = frame.pop_int()?;
    if b == 0 {
        return Err(JvmError::DivisionByZero);
    }
    frame.push_int(a.wrapping_div(b))
}

#[inline]
pub(super) fn handle_irem(frame: &mut Frame) -> Result<(), JvmError> {
    let b = frame.pop_int()?;
    let a = frame.pop_int()?;
    if b == 0 {
        return Err(JvmError::DivisionByZero);
    }
    frame.push_int(a.wrapping_rem(b))
}

#[inline]
pub(super) fn handle_ineg(frame: &mut Frame) -> Result<(), JvmError> {
    let value = frame.pop_int()?;
    frame.push_int(value.wrapping_neg())
}

#[inline]
pub(super) fn handle_iinc(frame: &mut Frame, index: u8, delta: i8) -> Result<(), JvmError> {
    let current = frame.get_local_int(index as usize)?;
    frame.set_local_int(index as usize, current.wrapping_add(delta as i32))
}

#[inline]
pub(super) fn handle_if_int(
    frame: &mut Frame,
    offset: i16,
    size: usize,
    taken: impl Fn(i32) -> bool,
) -> Result<(), JvmError> {
    let pc = frame.pc;
    let value = frame.pop_int()?;
    frame.pc = if taken(value) {
        branch16(pc, offset)
    } else {
        pc + size
    };
    Ok(())
}

#[inline]
pub(super) fn handle_if_icmp(
    frame: &mut Frame,
    offset: i16,
    size: usize,
    taken: impl Fn(i32, i32) -> bool,
) -> Result<(), JvmError> {
    let pc = frame.pc;
    let b = frame.pop_int()?;
    let a = frame.pop_int()?;
    frame.pc = if taken(a, b) {
        branch16(pc, offset)
    } else {
        pc + size
    };
    Ok(())
}

#[inline]
pub(super) fn handle_goto(frame: &mut Frame, offset: i16) -> Result<(), JvmError> {
    frame.pc = branch16(frame.pc, offset);
    Ok(())
}

#[inline]
pub(super) fn handle_getstatic(
    frame: &mut Frame,
    class: &Rc<InstanceClass>,
    vm: &mut VirtualMachine,
    index: u16,
) -> Result<(), JvmError> {
    let (owner, key) = field_ref_owned(class, index)?;
    let ty = parse_field_descriptor(&key.desc)?;
    let declaring = Interpreter::resolve_field(vm, &owner, &key, true)?;
    let value = declaring.static_field_value(&key)?;
    push_field_value(frame, &ty, value)
}

#[inline]
pub(super) fn handle_putstatic(
    frame: &mut Frame,
    class: &Rc<InstanceClass>,
    vm: &mut VirtualMachine,
    index: u16,
) -> Result<(), JvmError> {
    let (owner, key) = field_ref_owned(class, index)?;
    let ty = parse_field_descriptor(&key.desc)?;
    let value = pop_field_value(frame, &ty)?;
    let declaring = Interpreter::resolve_field(vm, &owner, &key, true)?;
    declaring.set_static_field_value(&key, value)
}

#[inline]
pub(super) fn handle_getfield(
    frame: &mut Frame,
    class: &Rc<InstanceClass>,
    vm: &mut VirtualMachine,
    index: u16,
) -> Result<(), JvmError> {
    let (owner, key) = field_ref_owned(class, index)?;
    let ty = parse_field_descriptor(&key.desc)?;
    let object = frame
        .pop_ref()?
        .ok_or(JvmError::NullPointer { context: "getfield" })?;
    let declaring = Interpreter::resolve_field(vm, &owner, &key, false)?;
    let value = vm.heap.get(object)?.get_field(declaring.name(), &key)?;
    push_field_value(frame, &ty, value)
}

#[inline]
pub(super) fn handle_putfield(
    frame: &mut Frame,
    class: &Rc<InstanceClass>,
    vm: &mut VirtualMachine,
    index: u16,
) -> Result<(), JvmError> {
    let (owner, key) = field_ref_owned(class, index)?;
    let ty = parse_field_descriptor(&key.desc)?;
    let value = pop_field_value(frame, &ty)?;
    let object = frame
        .pop_ref()?
        .ok_or(JvmError::NullPointer { context: "putfield" })?;
    let declaring = Interpreter::resolve_field(vm, &owner, &key, false)?;
    vm.heap
        .get_mut(object)?
        .set_field(declaring.name(), &key, value)
}

#[inline]
pub(super) fn handle_invokestatic(
    frame: &mut Frame,
    class: &Rc<InstanceClass>,
    vm: &mut VirtualMachine,
    index: u16,
) -> Result<(), JvmError> {
    let (owner, key) = method_ref_owned(class, index)?;
    let (target, method_index) = Interpreter::resolve_static_method(vm, &owner, &key)?;
    let args = {
        let descriptor = target.method(method_index).descriptor();
        Interpreter::pop_int_args(frame, descriptor, &key.desc)?
    };
    let result = Interpreter::invoke_method(vm, &target, method_index, None, &args)?;
    let ret = target.method(method_index).descriptor().ret.clone();
    Interpreter::push_return(frame, &ret, &key.desc, result)
}

#[inline]
pub(super) fn handle_invokespecial(
    frame: &mut Frame,
    class: &Rc<InstanceClass>,
    vm: &mut VirtualMachine,
    index: u16,
) -> Result<(), JvmError> {
    let (owner, key) = method_ref_owned(class, index)?;
    let descriptor = parse_method_descriptor(&key.desc)?;
    let args = Interpreter::pop_int_args(frame, &descriptor, &key.desc)?;
    let receiver = frame.pop_ref()?.ok_or(JvmError::NullPointer {
        context: "invokespecial",
    })?;
    // the referenced class decides the target; no receiver-driven dispatch
    let referenced = vm.load_class(&owner)?;
    let (declaring, method_index) = Interpreter::resolve_instance_method(vm, &referenced, &key)?;
    let result = Interpreter::invoke_method(vm, &declaring, method_index, Some(receiver), &args)?;
    Interpreter::push_return(frame, &descriptor.ret, &key.desc, result)
}

#[inline]
pub(super) fn handle_invokevirtual(
    frame: &mut Frame,
    class: &Rc<InstanceClass>,
    vm: &mut VirtualMachine,
    index: u16,
) -> Result<(), JvmError> {
    let (_, key) = method_ref_owned(class, index)?;
    let descriptor = parse_method_descriptor(&key.desc)?;
    let args = Interpreter::pop_int_args(frame, &descriptor, &key.desc)?;
    let receiver = frame.pop_ref()?.ok_or(JvmError::NullPointer {
        context: "invokevirtual",
    })?;
    // dynamic dispatch: start the walk at the receiver's own class
    let dynamic_name = vm.heap.get(receiver)?.class_name().to_string();
    let dynamic = vm.load_class(&dynamic_name)?;
    let (declaring, method_index) = Interpreter::resolve_instance_method(vm, &dynamic, &key)?;
    let result = Interpreter::invoke_method(vm, &declaring, method_index, Some(receiver), &args)?;
    Interpreter::push_return(frame, &descriptor.ret, &key.desc, result)
}

#[inline]
pub(super) fn handle_new(
    frame: &mut Frame,
    class: &Rc<InstanceClass>,
    vm: &mut VirtualMachine,
    index: u16,
) -> Result<(), JvmError> {
    let name = class.cp().get_class_name(index)?.to_string();
    let target = vm.load_class(&name)?;
    let object = vm.new_object(&target)?;
    frame.push_ref(Some(object))
}

#[inline]
pub(super) fn handle_ireturn(frame: &mut Frame) -> Result<Value, JvmError> {
    Ok(Value::Int(frame.pop_int()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_targets_are_relative_to_the_opcode() {
        assert_eq!(branch16(6, 13), 19);
        assert_eq!(branch16(16, -12), 4);
        assert_eq!(branch16(5, 0), 5);
    }
}
