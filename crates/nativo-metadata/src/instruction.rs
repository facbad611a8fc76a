//! Method body instructions.
//!
//! Opcodes are carried by their ECMA-335 mnemonic. Mnemonics the translator
//! has no name for are kept as [`OpCode::Other`] instead of failing the read,
//! so the rejection happens later with a located diagnostic.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::signature::TypeSig;

macro_rules! opcodes {
    ($($variant:ident => $mnemonic:literal,)*) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum OpCode {
            $($variant,)*
            /// Any mnemonic not listed above.
            Other(String),
        }

        impl OpCode {
            pub fn mnemonic(&self) -> &str {
                match self {
                    $(OpCode::$variant => $mnemonic,)*
                    OpCode::Other(mnemonic) => mnemonic,
                }
            }
        }

        impl From<&str> for OpCode {
            fn from(value: &str) -> Self {
                match value {
                    $($mnemonic => OpCode::$variant,)*
                    other => OpCode::Other(other.to_string()),
                }
            }
        }
    };
}

opcodes! {
    Nop => "nop",
    Pop => "pop",
    Dup => "dup",
    Ret => "ret",
    Ldnull => "ldnull",
    LdcI4M1 => "ldc.i4.m1",
    LdcI4_0 => "ldc.i4.0",
    LdcI4_1 => "ldc.i4.1",
    LdcI4_2 => "ldc.i4.2",
    LdcI4_3 => "ldc.i4.3",
    LdcI4_4 => "ldc.i4.4",
    LdcI4_5 => "ldc.i4.5",
    LdcI4_6 => "ldc.i4.6",
    LdcI4_7 => "ldc.i4.7",
    LdcI4_8 => "ldc.i4.8",
    LdcI4S => "ldc.i4.s",
    LdcI4 => "ldc.i4",
    LdcI8 => "ldc.i8",
    Ldarg0 => "ldarg.0",
    Ldarg1 => "ldarg.1",
    Ldarg2 => "ldarg.2",
    Ldarg3 => "ldarg.3",
    LdargS => "ldarg.s",
    Ldarg => "ldarg",
    LdargaS => "ldarga.s",
    Ldarga => "ldarga",
    Ldloc0 => "ldloc.0",
    Ldloc1 => "ldloc.1",
    Ldloc2 => "ldloc.2",
    Ldloc3 => "ldloc.3",
    LdlocS => "ldloc.s",
    Ldloc => "ldloc",
    LdlocaS => "ldloca.s",
    Ldloca => "ldloca",
    Stloc0 => "stloc.0",
    Stloc1 => "stloc.1",
    Stloc2 => "stloc.2",
    Stloc3 => "stloc.3",
    StlocS => "stloc.s",
    Stloc => "stloc",
    Ldstr => "ldstr",
    Ldsfld => "ldsfld",
    Stsfld => "stsfld",
    Ldfld => "ldfld",
    Stfld => "stfld",
    LdindI1 => "ldind.i1",
    LdindU1 => "ldind.u1",
    LdindI2 => "ldind.i2",
    LdindU2 => "ldind.u2",
    LdindI4 => "ldind.i4",
    LdindU4 => "ldind.u4",
    LdindI8 => "ldind.i8",
    LdindI => "ldind.i",
    LdindR4 => "ldind.r4",
    LdindR8 => "ldind.r8",
    LdindRef => "ldind.ref",
    StindI1 => "stind.i1",
    StindI2 => "stind.i2",
    StindI4 => "stind.i4",
    StindI8 => "stind.i8",
    StindI => "stind.i",
    StindR4 => "stind.r4",
    StindR8 => "stind.r8",
    StindRef => "stind.ref",
    Add => "add",
    Sub => "sub",
    Mul => "mul",
    Div => "div",
    Rem => "rem",
    And => "and",
    Or => "or",
    Xor => "xor",
    Shl => "shl",
    Shr => "shr",
    Ceq => "ceq",
    Cgt => "cgt",
    CgtUn => "cgt.un",
    Clt => "clt",
    CltUn => "clt.un",
    ConvI1 => "conv.i1",
    ConvI2 => "conv.i2",
    ConvI4 => "conv.i4",
    ConvI8 => "conv.i8",
    ConvU1 => "conv.u1",
    ConvU2 => "conv.u2",
    ConvU4 => "conv.u4",
    ConvU8 => "conv.u8",
    ConvR4 => "conv.r4",
    ConvR8 => "conv.r8",
    ConvI => "conv.i",
    ConvU => "conv.u",
    Box => "box",
    UnboxAny => "unbox.any",
    Newarr => "newarr",
    Newobj => "newobj",
    Call => "call",
    Callvirt => "callvirt",
    Sizeof => "sizeof",
    Br => "br",
    BrS => "br.s",
    Brtrue => "brtrue",
    BrtrueS => "brtrue.s",
    Brfalse => "brfalse",
    BrfalseS => "brfalse.s",
    Beq => "beq",
    BeqS => "beq.s",
    BneUn => "bne.un",
    BneUnS => "bne.un.s",
    Bge => "bge",
    BgeS => "bge.s",
    Bgt => "bgt",
    BgtS => "bgt.s",
    Ble => "ble",
    BleS => "ble.s",
    Blt => "blt",
    BltS => "blt.s",
}

impl From<String> for OpCode {
    fn from(value: String) -> Self {
        OpCode::from(value.as_str())
    }
}

impl From<OpCode> for String {
    fn from(value: OpCode) -> Self {
        value.mnemonic().to_string()
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Reference to a field by declaring type and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    #[serde(rename = "type")]
    pub declaring_type: String,
    pub name: String,
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}

/// Reference to a method by declaring type and name.
///
/// `parameters` disambiguates overloads by arity; when absent the first
/// method with that name wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    #[serde(rename = "type")]
    pub declaring_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<usize>,
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)?;
        if let Some(arity) = self.parameters {
            write!(f, "/{arity}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Int(i64),
    Float(f64),
    String(String),
    /// Local variable slot.
    Local(u32),
    /// Raw argument slot (slot 0 is the receiver of an instance method).
    Arg(u32),
    Field(FieldRef),
    Method(MethodRef),
    Type(TypeSig),
    /// Offset of the branch target instruction.
    Target(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub offset: u32,
    pub opcode: OpCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand: Option<Operand>,
}

impl Instruction {
    pub fn new(offset: u32, opcode: OpCode) -> Self {
        Self {
            offset,
            opcode,
            operand: None,
        }
    }

    #[must_use]
    pub fn with_operand(mut self, operand: Operand) -> Self {
        self.operand = Some(operand);
        self
    }

    pub fn branch_target(&self) -> Option<u32> {
        match self.operand {
            Some(Operand::Target(target)) => Some(target),
            _ => None,
        }
    }
}
