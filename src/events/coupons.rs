use anyhow::Result;
use substreams::log;

use crate::{
    events::{EventHandler, HandlerContext},
    identifiers::{coupon_id, dao_id, to_hex},
    pb::tribute::v1::{Coupon, CouponRedeemed},
};

impl EventHandler for CouponRedeemed {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        log::info!(
            "CouponRedeemed dao {} authorizedMember {} amount {} nonce {}",
            to_hex(&self.dao_address),
            to_hex(&self.authorized_member),
            self.amount,
            self.nonce
        );

        let id = coupon_id(&self.dao_address, &self.nonce, &self.authorized_member);
        let mut coupon = ctx
            .load::<Coupon>(&id)?
            .unwrap_or_else(|| Coupon {
                id,
                tribute_dao: dao_id(&self.dao_address),
                ..Default::default()
            });
        coupon.authorized_member = self.authorized_member.clone();
        coupon.amount = self.amount.clone();
        coupon.nonce = self.nonce.clone();
        coupon.redeemed_at = ctx.timestamp();

        ctx.save(&coupon);
        Ok(())
    }
}
