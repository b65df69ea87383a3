//! Decoded instruction records.

use std::fmt;

use ppcd_isa::{Address, InstrClass};

use crate::operand::Operand;

macro_rules! mnemonics {
    ($($name:ident),* $(,)?) => {
        /// PowerPC mnemonics. Record (`.`) forms are not separate mnemonics;
        /// see [`PowerPcInstruction::sets_cr0`].
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Mnemonic {
            $($name,)*
        }

        impl Mnemonic {
            /// Every mnemonic, in declaration order.
            pub const ALL: &'static [Mnemonic] = &[$(Mnemonic::$name,)*];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Mnemonic::$name => stringify!($name),)*
                }
            }
        }
    };
}

mnemonics! {
    illegal, add, addc, addco, adde, addeo, addi, addic, addis, addme, addmeo, addo, addze,
    addzeo, and, andc, andi, andis, b, ba, bc, bca, bcctr, bcctrl, bcl, bcla, bclr, bclrl, bl,
    bla, cmpd, cmpdi, cmpld, cmpldi, cmplw, cmplwi, cmpw, cmpwi, cntlzd, cntlzw, crand, crandc,
    creqv, crnand, crnor, cror, crorc, crxor, dcbf, dcbi, dcbst, dcbt, dcbtst, dcbz, divd,
    divdo, divdu, divduo, divw, divwo, divwu, divwuo, eieio, eqv, extsb, extsh, extsw, fabs,
    fadd, fadds, fcfid, fcmpo, fcmpu, fctid, fctidz, fctiw, fctiwz, fdiv, fdivs, fmadd, fmadds,
    fmr, fmsub, fmsubs, fmul, fmuls, fnabs, fneg, fnmadd, fnmadds, fnmsub, fnmsubs, fres, frsp,
    frsqrte, fsel, fsqrt, fsqrts, fsub, fsubs, icbi, isync, lbz, lbzu, lbzux, lbzx, ld, ldarx,
    ldu, ldux, ldx, lfd, lfdp, lfdu, lfdux, lfdx, lfs, lfsu, lfsux, lfsx, lha, lhau, lhaux,
    lhax, lhbrx, lhz, lhzu, lhzux, lhzx, lmw, lvebx, lvehx, lvewx, lvewx128, lvlx128, lvlxl128,
    lvrx128, lvrxl128, lvsl, lvsl128, lvsr, lvsr128, lvx, lvx128, lvxl, lvxl128, lwa, lwarx,
    lwax, lwbrx, lwz, lwzu, lwzux, lwzx, mcrf, mcrfs, mcrxr, mfcr, mffs, mfmsr, mfspr, mfsr,
    mftb, mfvscr, mtcrf, mtfsb0, mtfsb1, mtfsf, mtfsfi, mtmsr, mtspr, mtsr, mtvscr, mulhd,
    mulhdu, mulhw, mulhwu, mulld, mulldo, mulli, mullw, mullwo, nand, neg, nego, nor, or, orc,
    ori, oris, rfi, rfid, rldcl, rldcr, rldic, rldicl, rldicr, rldimi, rlwimi, rlwinm, rlwnm,
    sc, sld, slw, srad, sradi, sraw, srawi, srd, srw, stb, stbu, stbux, stbx, std, stdcx, stdu,
    stdux, stdx, stfd, stfdp, stfdu, stfdux, stfdx, stfiwx, stfs, stfsu, stfsux, stfsx, sth,
    sthbrx, sthu, sthux, sthx, stmw, stvebx, stvehx, stvewx, stvewx128, stvlx128, stvlxl128,
    stvrx128, stvrxl128, stvx, stvx128, stvxl, stvxl128, stw, stwbrx, stwcx, stwu, stwux, stwx,
    subf, subfc, subfco, subfe, subfeo, subfic, subfme, subfmeo, subfo, subfze, subfzeo, sync,
    td, tdi, tlbie, tlbsync, tw, twi, vaddcuw, vaddfp, vaddfp128, vaddsbs, vaddshs, vaddsws,
    vaddubm, vaddubs, vadduhm, vadduhs, vadduwm, vadduws, vand, vand128, vandc, vandc128,
    vavgsb, vavgsh, vavgsw, vavgub, vavguh, vavguw, vcfpsxws128, vcfpuxws128, vcfsx, vcfux,
    vcmpbfp, vcmpbfp128, vcmpeqfp, vcmpeqfp128, vcmpequb, vcmpequh, vcmpequw, vcmpequw128,
    vcmpgefp, vcmpgefp128, vcmpgtfp, vcmpgtfp128, vcmpgtsb, vcmpgtsh, vcmpgtsw, vcmpgtub,
    vcmpgtuh, vcmpgtuw, vcsxwfp128, vctsxs, vctuxs, vcuxwfp128, vexptefp, vexptefp128, vlogefp,
    vlogefp128, vmaddcfp128, vmaddfp, vmaddfp128, vmaxfp, vmaxfp128, vmaxsb, vmaxsh, vmaxsw,
    vmaxub, vmaxuh, vmaxuw, vmhaddshs, vmhraddshs, vminfp, vminfp128, vminsb, vminsh, vminsw,
    vminub, vminuh, vminuw, vmladduhm, vmrghb, vmrghh, vmrghw, vmrghw128, vmrglb, vmrglh,
    vmrglw, vmrglw128, vmsum3fp128, vmsum4fp128, vmsummbm, vmsumshm, vmsumshs, vmsumubm,
    vmsumuhm, vmsumuhs, vmulesb, vmulesh, vmuleub, vmuleuh, vmulfp128, vmulosb, vmulosh,
    vmuloub, vmulouh, vnmsubfp, vnmsubfp128, vnor, vnor128, vor, vor128, vperm, vperm128, vpkpx,
    vpkshss, vpkshss128, vpkshus, vpkshus128, vpkswss, vpkswss128, vpkswus, vpkswus128, vpkuhum,
    vpkuhum128, vpkuhus, vpkuhus128, vpkuwum, vpkuwum128, vpkuwus, vpkuwus128, vrefp, vrefp128,
    vrfim, vrfim128, vrfin, vrfin128, vrfip, vrfip128, vrfiz, vrfiz128, vrlb, vrlh, vrlw,
    vrlw128, vrsqrtefp, vrsqrtefp128, vsel, vsel128, vsl, vslb, vsldoi, vslh, vslo, vslo128,
    vslw, vslw128, vspltb, vsplth, vspltisb, vspltish, vspltisw, vspltisw128, vspltw, vspltw128,
    vsr, vsrab, vsrah, vsraw, vsraw128, vsrb, vsrh, vsro, vsro128, vsrw, vsrw128, vsubcuw,
    vsubfp, vsubfp128, vsubsbs, vsubshs, vsubsws, vsububm, vsububs, vsubuhm, vsubuhs, vsubuwm,
    vsubuws, vsum2sws, vsum4sbs, vsum4shs, vsum4ubs, vsumsws, vupkhpx, vupkhsb, vupkhsb128,
    vupkhsh, vupklpx, vupklsb, vupklsb128, vupklsh, vxor, vxor128, xor, xori, xoris,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded 32-bit word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerPcInstruction {
    pub mnemonic: Mnemonic,
    pub class: InstrClass,
    pub address: Address,
    /// Always 4.
    pub length: usize,
    /// In assembly order.
    pub operands: Vec<Operand>,
    /// The record form: the instruction also updates CR0.
    pub sets_cr0: bool,
}

impl PowerPcInstruction {
    /// The `illegal` record used for every encoding that does not decode.
    pub fn invalid(address: Address) -> Self {
        Self {
            mnemonic: Mnemonic::illegal,
            class: InstrClass::INVALID,
            address,
            length: 4,
            operands: Vec::new(),
            sets_cr0: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.class.contains(InstrClass::INVALID)
    }

    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }

    /// Address of the following instruction.
    pub fn next_address(&self) -> Address {
        self.address.offset(self.length as i64)
    }
}

impl fmt::Display for PowerPcInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic.as_str())?;
        if self.sets_cr0 {
            f.write_str(".")?;
        }
        for (i, op) in self.operands.iter().enumerate() {
            f.write_str(if i == 0 { "\t" } else { "," })?;
            write!(f, "{op}")?;
        }
        Ok(())
    }
}
