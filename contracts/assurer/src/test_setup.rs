extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env,
};

use crate::config::{CLAIM_FEE, DONATE_FEE, UNIT};
use crate::{Assurer, AssurerClient};

/// Ledger timestamp every test starts from (the campaign's `created_time`).
pub const START: u64 = 1_700_000_000;
pub const ONE_HOUR: u64 = 3_600;

/// Reference terms: goal 100, guarantee 20, 10 participants, 1 hour.
pub const GOAL: i128 = 100 * UNIT;
pub const GUARANTEE: i128 = 20 * UNIT;
pub const PARTICIPANTS: u32 = 10;
pub const INIT_VALUE: i128 = 25 * UNIT;
pub const DONATE_AMOUNT: i128 = 10 * UNIT;

pub struct Setup {
    pub env: Env,
    pub client: AssurerClient<'static>,
    pub author: Address,
    pub token: token::Client<'static>,
    pub minter: token::StellarAssetClient<'static>,
}

pub fn setup() -> Setup {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = START);

    let author = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    let token = token::Client::new(&env, &sac.address());
    let minter = token::StellarAssetClient::new(&env, &sac.address());
    minter.mint(&author, &(1_000 * UNIT));

    let contract_id = env.register(Assurer, (author.clone(), sac.address()));
    let client = AssurerClient::new(&env, &contract_id);

    Setup {
        env,
        client,
        author,
        token,
        minter,
    }
}

/// Deployed and initialized with the reference terms.
pub fn setup_initialized() -> Setup {
    let s = setup();
    s.init(GOAL, GUARANTEE, PARTICIPANTS, START + ONE_HOUR, INIT_VALUE);
    s
}

impl Setup {
    pub fn init(
        &self,
        goal: i128,
        guarantee_amount: i128,
        participants_count: u32,
        valid_until: u64,
        value: i128,
    ) {
        self.client.initialize(
            &self.author,
            &goal,
            &guarantee_amount,
            &participants_count,
            &valid_until,
            &value,
        );
    }

    /// A fresh identity holding enough tokens for one donation.
    pub fn funded_donor(&self) -> Address {
        let donor = Address::generate(&self.env);
        self.minter.mint(&donor, &(100 * UNIT));
        donor
    }

    /// Exact charge of one donation under the current terms.
    pub fn charge(&self) -> i128 {
        self.client.get_campaign().donate_amount + DONATE_FEE
    }

    pub fn donate(&self, donor: &Address) {
        self.client.donate(donor, &self.charge());
    }

    /// Create `count` funded donors and donate from each.
    pub fn donate_many(&self, count: u32) -> std::vec::Vec<Address> {
        (0..count)
            .map(|_| {
                let donor = self.funded_donor();
                self.donate(&donor);
                donor
            })
            .collect()
    }

    /// Claim as the author, attaching exactly the service fee.
    pub fn claim(&self) {
        self.client.claim(&self.author, &CLAIM_FEE);
    }

    /// Submit Return requests until the campaign ends. Returns how many it took.
    pub fn return_all(&self) -> u32 {
        let mut requests = 0;
        while !self.client.get_campaign().ended {
            self.client.return_funds();
            requests += 1;
        }
        requests
    }

    pub fn set_time(&self, timestamp: u64) {
        self.env.ledger().with_mut(|li| li.timestamp = timestamp);
    }

    pub fn balance(&self, address: &Address) -> i128 {
        self.token.balance(address)
    }
}
